// changelog parsing, linting and editing

pub mod config;
pub mod parser;
pub mod release;
pub mod render;
pub mod types;
pub mod validator;
pub mod version;

pub use config::ChangelogConfig;
pub use parser::{parse_changelog, parse_changelog_str};
pub use release::{add_entry, parse_release_date, promote_unreleased};
pub use render::{
    is_canonical, render_changelog, render_version, version_heading, write_changelog,
};
pub use types::{
    ChangeCategory, ChangeEntry, ChangeGroup, Changelog, ChangelogAnalysis, ChangelogStatus,
    VersionSection,
};
pub use validator::{has_version_entry, validate_changelog, version_has_content};
pub use version::{ReleaseDate, VersionLabel};
