// changelog validator

use super::config::ChangelogConfig;
use super::types::{ChangeCategory, Changelog, VersionSection};
use super::version::{ReleaseDate, VersionLabel};
use crate::utils::severity::{Issue, IssueType};
use crate::utils::severity_config::SeverityConfig;
use chrono::NaiveDate;
use semver::Version;
use std::collections::HashSet;

/// validate a changelog against configuration rules
///
/// issues found while parsing come first, with their severity taken from
/// `severity`, followed by the header check and the per-version rules in
/// document order
pub fn validate_changelog(
    changelog: &Changelog,
    config: &ChangelogConfig,
    severity: &SeverityConfig,
) -> Vec<Issue> {
    let mut issues: Vec<Issue> = changelog
        .format_issues
        .iter()
        .map(|issue| Issue {
            severity: severity.get_severity(issue.issue_type),
            ..issue.clone()
        })
        .collect();

    if config.require_header && !changelog.has_header() {
        issues.push(severity.issue(
            IssueType::MissingHeader,
            "missing '# Changelog' title".to_string(),
        ));
    }

    validate_ordering(changelog, severity, &mut issues);

    for section in &changelog.versions {
        validate_section(changelog, section, config, severity, &mut issues);
    }

    issues
}

/// versions must be strictly descending, dates non-increasing, and pending
/// sections must sit above every dated release
fn validate_ordering(changelog: &Changelog, severity: &SeverityConfig, issues: &mut Vec<Issue>) {
    let mut seen_labels: HashSet<&VersionLabel> = HashSet::new();
    let mut previous_version: Option<&Version> = None;
    let mut previous_date: Option<NaiveDate> = None;

    for section in &changelog.versions {
        let line = section.line_number;

        if !seen_labels.insert(&section.label) {
            issues.push(
                severity
                    .issue(
                        IssueType::DuplicateVersion,
                        format!("version {} appears more than once", section.raw_label),
                    )
                    .at_line(line),
            );
            continue;
        }

        if section.is_pending() && previous_date.is_some() {
            issues.push(
                severity
                    .issue(
                        IssueType::UnreleasedPosition,
                        format!(
                            "pending section {} appears below a dated release",
                            section.raw_label
                        ),
                    )
                    .at_line(line),
            );
        }

        if let Some(version) = section.version() {
            if let Some(previous) = previous_version
                && version >= previous
            {
                issues.push(
                    severity
                        .issue(
                            IssueType::VersionOrder,
                            format!(
                                "version {} should appear above version {}",
                                section.raw_label, previous
                            ),
                        )
                        .at_line(line),
                );
            }
            previous_version = Some(version);
        }

        if let ReleaseDate::Dated(date) = section.date {
            if let Some(previous) = previous_date
                && date > previous
            {
                issues.push(
                    severity
                        .issue(
                            IssueType::DateOrder,
                            format!(
                                "version {} is dated {} which is newer than the release above it ({})",
                                section.raw_label, date, previous
                            ),
                        )
                        .at_line(line),
                );
            }
            previous_date = Some(date);
        }
    }
}

fn validate_section(
    changelog: &Changelog,
    section: &VersionSection,
    config: &ChangelogConfig,
    severity: &SeverityConfig,
    issues: &mut Vec<Issue>,
) {
    let label = &section.raw_label;
    let line = section.line_number;

    if config.require_dates && section.label.is_released() && section.date == ReleaseDate::Missing
    {
        issues.push(
            severity
                .issue(
                    IssueType::MissingDate,
                    format!("version {} has no release date", label),
                )
                .at_line(line),
        );
    }

    if !section.is_pending() && !section.has_content() {
        issues.push(
            severity
                .issue(
                    IssueType::EmptyVersion,
                    format!("version {} has no changelog entries", label),
                )
                .at_line(line),
        );
    }

    if config.require_links
        && section.bracketed
        && section.label.is_released()
        && changelog.link_for(label).is_none()
    {
        issues.push(
            severity
                .issue(
                    IssueType::MissingLink,
                    format!("version {} has no link reference", label),
                )
                .at_line(line),
        );
    }

    let mut seen: HashSet<(Option<&ChangeCategory>, &ChangeCategory)> = HashSet::new();

    for (index, group) in section.groups.iter().enumerate() {
        if !config.is_allowed_category(&group.category) {
            issues.push(
                severity
                    .issue(
                        IssueType::UnknownCategory,
                        format!(
                            "version {}: category '{}' is not allowed",
                            label, group.category
                        ),
                    )
                    .at_line(group.line_number),
            );
        }

        if !seen.insert((group.parent.as_ref(), &group.category)) {
            issues.push(
                severity
                    .issue(
                        IssueType::DuplicateSection,
                        format!(
                            "version {}: category '{}' appears more than once",
                            label,
                            group.display_name()
                        ),
                    )
                    .at_line(group.line_number),
            );
        }

        let has_children = !group.is_nested()
            && section
                .groups
                .get(index + 1)
                .is_some_and(|next| next.is_nested());

        if group.entries.is_empty() && !has_children {
            issues.push(
                severity
                    .issue(
                        IssueType::EmptySection,
                        format!(
                            "version {}: category '{}' has no entries",
                            label,
                            group.display_name()
                        ),
                    )
                    .at_line(group.line_number),
            );
        }
    }
}

/// check if a version has a changelog entry
pub fn has_version_entry(changelog: &Changelog, version: &Version) -> bool {
    changelog.has_version(version)
}

/// check if a version section has meaningful content
pub fn version_has_content(changelog: &Changelog, version: &Version) -> bool {
    changelog
        .find_version(version)
        .is_some_and(|section| section.has_content())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::changelog::parser::parse_changelog_str;
    use crate::utils::severity::IssueSeverity;

    fn validate(content: &str) -> Vec<Issue> {
        let changelog = parse_changelog_str(content, "CHANGELOG.md");
        validate_changelog(
            &changelog,
            &ChangelogConfig::default(),
            &SeverityConfig::default(),
        )
    }

    fn types(issues: &[Issue]) -> Vec<IssueType> {
        issues.iter().map(|i| i.issue_type).collect()
    }

    #[test]
    fn test_valid_changelog_has_no_issues() {
        let issues = validate(
            "# Changelog\n\
             ## [0.0.15] - tbd\n\
             ### Added\n\
             - upcoming\n\
             ## [0.0.14] - 2023-10-11\n\
             ### Added\n\
             #### Minor\n\
             - Added `SpatialData.subset()` API\n\
             ### Fixed\n\
             - Fixed `get_extent()`\n\
             ## [0.0.13] - 2023-09-01\n\
             ### Fixed\n\
             - io fix\n",
        );
        assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
    }

    #[test]
    fn test_version_order_violation() {
        let issues = validate(
            "# Changelog\n\
             ## [0.0.13] - 2023-09-01\n\
             ### Fixed\n\
             - a\n\
             ## [0.0.14] - 2023-08-01\n\
             ### Fixed\n\
             - b\n",
        );
        assert_eq!(types(&issues), vec![IssueType::VersionOrder]);
        assert_eq!(issues[0].line, Some(5));
    }

    #[test]
    fn test_date_order_violation() {
        let issues = validate(
            "# Changelog\n\
             ## [0.0.14] - 2023-09-01\n\
             ### Fixed\n\
             - a\n\
             ## [0.0.13] - 2023-10-01\n\
             ### Fixed\n\
             - b\n",
        );
        assert_eq!(types(&issues), vec![IssueType::DateOrder]);
    }

    #[test]
    fn test_duplicate_version() {
        let issues = validate(
            "# Changelog\n\
             ## [0.1.0] - 2024-01-01\n\
             ### Added\n\
             - a\n\
             ## [0.1.0] - 2024-01-01\n\
             ### Added\n\
             - b\n",
        );
        assert_eq!(types(&issues), vec![IssueType::DuplicateVersion]);
    }

    #[test]
    fn test_unreleased_below_release() {
        let issues = validate(
            "# Changelog\n\
             ## [0.1.0] - 2024-01-01\n\
             ### Added\n\
             - a\n\
             ## [Unreleased]\n\
             ### Added\n\
             - b\n",
        );
        assert_eq!(types(&issues), vec![IssueType::UnreleasedPosition]);
    }

    #[test]
    fn test_missing_header_and_date() {
        let issues = validate("## [0.1.0]\n### Added\n- a\n");
        assert_eq!(
            types(&issues),
            vec![IssueType::MissingHeader, IssueType::MissingDate]
        );
        assert_eq!(issues[1].severity, IssueSeverity::Warning);
    }

    #[test]
    fn test_section_rules() {
        let issues = validate(
            "# Changelog\n\
             ## [0.1.0] - 2024-01-01\n\
             ### Misc\n\
             - a\n\
             ### Added\n\
             ### Fixed\n\
             - b\n\
             ### Fixed\n\
             - c\n",
        );
        assert_eq!(
            types(&issues),
            vec![
                IssueType::UnknownCategory,
                IssueType::EmptySection,
                IssueType::DuplicateSection,
            ]
        );
    }

    #[test]
    fn test_heading_with_only_subsections_is_not_empty() {
        let issues = validate(
            "# Changelog\n\
             ## [0.1.0] - 2024-01-01\n\
             ### Added\n\
             #### Major\n\
             - a\n\
             ### Fixed\n\
             #### Minor\n\
             - b\n",
        );
        assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
    }

    #[test]
    fn test_empty_release_warns() {
        let issues = validate("# Changelog\n## [0.1.0] - 2024-01-01\n");
        assert_eq!(types(&issues), vec![IssueType::EmptyVersion]);
        assert!(issues[0].is_warning());
    }

    #[test]
    fn test_missing_link_only_when_required() {
        let content = "# Changelog\n## [0.1.0] - 2024-01-01\n### Added\n- a\n";
        let changelog = parse_changelog_str(content, "CHANGELOG.md");
        let config = ChangelogConfig::default().require_links(true);
        let issues = validate_changelog(&changelog, &config, &SeverityConfig::default());
        assert_eq!(types(&issues), vec![IssueType::MissingLink]);
    }

    #[test]
    fn test_missing_link_skips_unreleased() {
        let content = "# Changelog\n\
                       ## [Unreleased]\n\
                       ### Added\n\
                       - b\n\
                       ## [0.0.x]\n\
                       ### Fixed\n\
                       - c\n\
                       ## [0.1.0] - 2024-01-01\n\
                       ### Added\n\
                       - a\n\
                       [0.1.0]: https://example.org/0.1.0\n";
        let changelog = parse_changelog_str(content, "CHANGELOG.md");
        let config = ChangelogConfig::default().require_links(true);
        let issues = validate_changelog(&changelog, &config, &SeverityConfig::default());
        assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
    }

    #[test]
    fn test_parse_issues_come_before_header_check() {
        let issues = validate("## [0.1.0] - 2024-01-01\n### Added\n- a\n## [next]\n");
        assert_eq!(
            types(&issues),
            vec![IssueType::InvalidVersion, IssueType::MissingHeader]
        );
    }

    #[test]
    fn test_parse_issue_severity_follows_config() {
        let changelog = parse_changelog_str(
            "# Changelog\n## [0.1.0] - 2024-01-01\n- orphan\n",
            "CHANGELOG.md",
        );
        let severity = SeverityConfig::uniform(IssueSeverity::Warning);
        let issues = validate_changelog(&changelog, &ChangelogConfig::default(), &severity);
        assert!(issues.iter().all(|i| i.is_warning()));
        assert!(types(&issues).contains(&IssueType::OrphanEntry));
    }

    #[test]
    fn test_version_helpers() {
        let changelog = parse_changelog_str(
            "# Changelog\n## [0.2.0] - 2024-02-01\n## [0.1.0] - 2024-01-01\n### Added\n- a\n",
            "CHANGELOG.md",
        );
        assert!(has_version_entry(&changelog, &Version::new(0, 2, 0)));
        assert!(!version_has_content(&changelog, &Version::new(0, 2, 0)));
        assert!(version_has_content(&changelog, &Version::new(0, 1, 0)));
        assert!(!has_version_entry(&changelog, &Version::new(0, 3, 0)));
    }
}
