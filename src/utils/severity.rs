use serde::{Deserialize, Serialize};
use std::fmt;

/// severity level for issues detected during linting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// error-level issue that should cause validation to fail
    Error,
    /// warning-level issue that is informational only
    Warning,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueSeverity::Error => write!(f, "ERROR"),
            IssueSeverity::Warning => write!(f, "WARN"),
        }
    }
}

impl std::str::FromStr for IssueSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(IssueSeverity::Error),
            "warning" | "warn" => Ok(IssueSeverity::Warning),
            _ => Err(format!("invalid severity: {}, use 'error' or 'warning'", s)),
        }
    }
}

/// type of issue detected in a changelog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    /// no top-level `# Changelog` title
    MissingHeader,
    /// version heading label could not be parsed
    InvalidVersion,
    /// release date could not be parsed
    InvalidDate,
    /// release has no date at all
    MissingDate,
    /// versions are not in descending order
    VersionOrder,
    /// release dates are not in descending order
    DateOrder,
    /// the same version heading appears more than once
    DuplicateVersion,
    /// unreleased or undated section below a dated release
    UnreleasedPosition,
    /// bullet outside of a version or category
    OrphanEntry,
    /// category heading outside of a version
    OrphanCategory,
    /// category not in the allowed list
    UnknownCategory,
    /// released version without entries
    EmptyVersion,
    /// category heading without entries
    EmptySection,
    /// category repeated within one version
    DuplicateSection,
    /// bracketed version without a link reference
    MissingLink,
    /// bullet without text
    EmptyEntry,
}

impl IssueType {
    pub const ALL: [IssueType; 16] = [
        IssueType::MissingHeader,
        IssueType::InvalidVersion,
        IssueType::InvalidDate,
        IssueType::MissingDate,
        IssueType::VersionOrder,
        IssueType::DateOrder,
        IssueType::DuplicateVersion,
        IssueType::UnreleasedPosition,
        IssueType::OrphanEntry,
        IssueType::OrphanCategory,
        IssueType::UnknownCategory,
        IssueType::EmptyVersion,
        IssueType::EmptySection,
        IssueType::DuplicateSection,
        IssueType::MissingLink,
        IssueType::EmptyEntry,
    ];
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IssueType::MissingHeader => "missing_header",
            IssueType::InvalidVersion => "invalid_version",
            IssueType::InvalidDate => "invalid_date",
            IssueType::MissingDate => "missing_date",
            IssueType::VersionOrder => "version_order",
            IssueType::DateOrder => "date_order",
            IssueType::DuplicateVersion => "duplicate_version",
            IssueType::UnreleasedPosition => "unreleased_position",
            IssueType::OrphanEntry => "orphan_entry",
            IssueType::OrphanCategory => "orphan_category",
            IssueType::UnknownCategory => "unknown_category",
            IssueType::EmptyVersion => "empty_version",
            IssueType::EmptySection => "empty_section",
            IssueType::DuplicateSection => "duplicate_section",
            IssueType::MissingLink => "missing_link",
            IssueType::EmptyEntry => "empty_entry",
        };
        write!(f, "{}", name)
    }
}

/// structured issue with severity, type, and message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// severity level of the issue
    pub severity: IssueSeverity,
    /// type of the issue
    pub issue_type: IssueType,
    /// 1-based line in the changelog, when the issue points at one
    pub line: Option<usize>,
    /// human-readable message describing the issue
    pub message: String,
}

impl Issue {
    /// create a new issue
    pub fn new(severity: IssueSeverity, issue_type: IssueType, message: String) -> Self {
        Self {
            severity,
            issue_type,
            line: None,
            message,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// check if this is an error-level issue
    pub fn is_error(&self) -> bool {
        self.severity == IssueSeverity::Error
    }

    /// check if this is a warning-level issue
    pub fn is_warning(&self) -> bool {
        self.severity == IssueSeverity::Warning
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "[{}] line {}: {}", self.severity, line, self.message),
            None => write!(f, "[{}] {}", self.severity, self.message),
        }
    }
}
