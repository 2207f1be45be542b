use super::severity::{Issue, IssueSeverity, IssueType};
use serde::{Deserialize, Serialize};

/// configuration for issue severity levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityConfig {
    pub missing_header: IssueSeverity,
    pub invalid_version: IssueSeverity,
    pub invalid_date: IssueSeverity,
    pub missing_date: IssueSeverity,
    pub version_order: IssueSeverity,
    pub date_order: IssueSeverity,
    pub duplicate_version: IssueSeverity,
    pub unreleased_position: IssueSeverity,
    pub orphan_entry: IssueSeverity,
    pub orphan_category: IssueSeverity,
    pub unknown_category: IssueSeverity,
    pub empty_version: IssueSeverity,
    pub empty_section: IssueSeverity,
    pub duplicate_section: IssueSeverity,
    pub missing_link: IssueSeverity,
    pub empty_entry: IssueSeverity,
}

impl SeverityConfig {
    /// get severity for a specific issue type
    pub fn get_severity(&self, issue_type: IssueType) -> IssueSeverity {
        match issue_type {
            IssueType::MissingHeader => self.missing_header,
            IssueType::InvalidVersion => self.invalid_version,
            IssueType::InvalidDate => self.invalid_date,
            IssueType::MissingDate => self.missing_date,
            IssueType::VersionOrder => self.version_order,
            IssueType::DateOrder => self.date_order,
            IssueType::DuplicateVersion => self.duplicate_version,
            IssueType::UnreleasedPosition => self.unreleased_position,
            IssueType::OrphanEntry => self.orphan_entry,
            IssueType::OrphanCategory => self.orphan_category,
            IssueType::UnknownCategory => self.unknown_category,
            IssueType::EmptyVersion => self.empty_version,
            IssueType::EmptySection => self.empty_section,
            IssueType::DuplicateSection => self.duplicate_section,
            IssueType::MissingLink => self.missing_link,
            IssueType::EmptyEntry => self.empty_entry,
        }
    }

    /// build an issue with the configured severity for its type
    pub fn issue(&self, issue_type: IssueType, message: String) -> Issue {
        Issue::new(self.get_severity(issue_type), issue_type, message)
    }

    /// same severity for every issue type
    pub fn uniform(severity: IssueSeverity) -> Self {
        Self {
            missing_header: severity,
            invalid_version: severity,
            invalid_date: severity,
            missing_date: severity,
            version_order: severity,
            date_order: severity,
            duplicate_version: severity,
            unreleased_position: severity,
            orphan_entry: severity,
            orphan_category: severity,
            unknown_category: severity,
            empty_version: severity,
            empty_section: severity,
            duplicate_section: severity,
            missing_link: severity,
            empty_entry: severity,
        }
    }
}

/// defaults:
/// - error: structure, parsing and ordering problems
/// - warning: missing dates and links, empty or repeated sections
impl Default for SeverityConfig {
    fn default() -> Self {
        Self {
            missing_date: IssueSeverity::Warning,
            empty_version: IssueSeverity::Warning,
            empty_section: IssueSeverity::Warning,
            duplicate_section: IssueSeverity::Warning,
            missing_link: IssueSeverity::Warning,
            ..Self::uniform(IssueSeverity::Error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_severities() {
        let config = SeverityConfig::default();
        assert_eq!(
            config.get_severity(IssueType::VersionOrder),
            IssueSeverity::Error
        );
        assert_eq!(
            config.get_severity(IssueType::MissingLink),
            IssueSeverity::Warning
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SeverityConfig = toml::from_str("version_order = \"warning\"").unwrap();
        assert_eq!(config.version_order, IssueSeverity::Warning);
        assert_eq!(config.orphan_entry, IssueSeverity::Error);
    }
}
