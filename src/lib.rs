pub mod error;
pub mod utils;

pub use error::*;
pub use utils::changelog::{
    ChangeCategory, ChangeEntry, ChangeGroup, Changelog, ChangelogAnalysis, ChangelogConfig,
    ChangelogStatus, ReleaseDate, VersionLabel, VersionSection, add_entry, has_version_entry,
    is_canonical, parse_changelog, parse_changelog_str, parse_release_date, promote_unreleased,
    render_changelog, render_version, validate_changelog, version_has_content, write_changelog,
};
pub use utils::changelog_checker::ChangelogChecker;
pub use utils::config::ChangelintConfig;
pub use utils::discovery::ChangelogDiscovery;
pub use utils::severity::{Issue, IssueSeverity, IssueType};
pub use utils::severity_config::SeverityConfig;
