// changelog data structures

use super::version::{ReleaseDate, VersionLabel};
use crate::utils::severity::Issue;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// category heading a change is filed under (`### Added`, `#### Minor`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChangeCategory {
    Added,
    Changed,
    Deprecated,
    Removed,
    Fixed,
    Security,
    Major,
    Minor,
    Technical,
    Updated,
    Improved,
    Tested,
    Merged,
    Other(String),
}

impl ChangeCategory {
    /// every named category, in the order they are listed by default
    pub const KNOWN: [ChangeCategory; 13] = [
        ChangeCategory::Added,
        ChangeCategory::Changed,
        ChangeCategory::Deprecated,
        ChangeCategory::Removed,
        ChangeCategory::Fixed,
        ChangeCategory::Security,
        ChangeCategory::Major,
        ChangeCategory::Minor,
        ChangeCategory::Technical,
        ChangeCategory::Updated,
        ChangeCategory::Improved,
        ChangeCategory::Tested,
        ChangeCategory::Merged,
    ];

    pub fn parse(heading: &str) -> Self {
        let heading = heading.trim().trim_end_matches(':').trim();
        Self::KNOWN
            .iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(heading))
            .cloned()
            .unwrap_or_else(|| ChangeCategory::Other(heading.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            ChangeCategory::Added => "Added",
            ChangeCategory::Changed => "Changed",
            ChangeCategory::Deprecated => "Deprecated",
            ChangeCategory::Removed => "Removed",
            ChangeCategory::Fixed => "Fixed",
            ChangeCategory::Security => "Security",
            ChangeCategory::Major => "Major",
            ChangeCategory::Minor => "Minor",
            ChangeCategory::Technical => "Technical",
            ChangeCategory::Updated => "Updated",
            ChangeCategory::Improved => "Improved",
            ChangeCategory::Tested => "Tested",
            ChangeCategory::Merged => "Merged",
            ChangeCategory::Other(name) => name,
        }
    }
}

impl fmt::Display for ChangeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ChangeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err("empty category".to_string());
        }
        Ok(Self::parse(s))
    }
}

impl From<String> for ChangeCategory {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ChangeCategory> for String {
    fn from(value: ChangeCategory) -> Self {
        value.as_str().to_string()
    }
}

/// represents a single bullet in a changelog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub text: String,
    pub line_number: usize,
    /// nested bullets below this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ChangeEntry {
    pub fn new(text: impl Into<String>, line_number: usize) -> Self {
        Self {
            text: text.into(),
            line_number,
            details: Vec::new(),
        }
    }
}

/// a category heading and the bullets below it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeGroup {
    pub category: ChangeCategory,
    /// set for `####` headings nested under a `###` heading
    pub parent: Option<ChangeCategory>,
    pub entries: Vec<ChangeEntry>,
    pub line_number: usize,
}

impl ChangeGroup {
    pub fn new(
        category: ChangeCategory,
        parent: Option<ChangeCategory>,
        line_number: usize,
    ) -> Self {
        Self {
            category,
            parent,
            entries: Vec::new(),
            line_number,
        }
    }

    pub fn add_entry(&mut self, entry: ChangeEntry) {
        self.entries.push(entry);
    }

    pub fn is_nested(&self) -> bool {
        self.parent.is_some()
    }

    /// heading as it reads in the document, e.g. `Added / Minor`
    pub fn display_name(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{} / {}", parent, self.category),
            None => self.category.to_string(),
        }
    }
}

/// represents a version section in the changelog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSection {
    pub label: VersionLabel,
    /// label text as written, used for rendering
    pub raw_label: String,
    pub date: ReleaseDate,
    pub groups: Vec<ChangeGroup>,
    pub line_number: usize,
    pub yanked: bool,
    /// heading wrapped the label in brackets (`## [0.1.0]`)
    pub bracketed: bool,
}

impl VersionSection {
    pub fn new(
        label: VersionLabel,
        raw_label: impl Into<String>,
        date: ReleaseDate,
        line_number: usize,
    ) -> Self {
        Self {
            label,
            raw_label: raw_label.into(),
            date,
            groups: Vec::new(),
            line_number,
            yanked: false,
            bracketed: true,
        }
    }

    pub fn unreleased(line_number: usize) -> Self {
        Self::new(
            VersionLabel::Unreleased,
            "Unreleased",
            ReleaseDate::Missing,
            line_number,
        )
    }

    pub fn add_group(&mut self, group: ChangeGroup) {
        self.groups.push(group);
    }

    pub fn version(&self) -> Option<&Version> {
        self.label.as_version()
    }

    /// an unreleased, placeholder, or `tbd` section
    pub fn is_pending(&self) -> bool {
        !self.label.is_released() || self.date == ReleaseDate::Tbd
    }

    pub fn entries(&self) -> impl Iterator<Item = &ChangeEntry> {
        self.groups.iter().flat_map(|g| g.entries.iter())
    }

    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    pub fn has_content(&self) -> bool {
        self.entry_count() > 0
    }

    /// first top-level group with the given category
    pub fn group(&self, category: &ChangeCategory) -> Option<&ChangeGroup> {
        self.groups
            .iter()
            .find(|g| &g.category == category && g.parent.is_none())
    }

    pub fn categories(&self) -> Vec<&ChangeCategory> {
        let mut categories: Vec<&ChangeCategory> = Vec::new();
        for group in &self.groups {
            if !categories.contains(&&group.category) {
                categories.push(&group.category);
            }
        }
        categories
    }

    /// matches `1.0.0`, `v1.0.0`, `unreleased` or the label as written
    pub fn matches_label(&self, query: &str) -> bool {
        let query = query.trim();
        if self.raw_label.eq_ignore_ascii_case(query) {
            return true;
        }
        match VersionLabel::parse(query) {
            Ok(label) => label == self.label,
            Err(_) => false,
        }
    }
}

/// represents a complete changelog file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Changelog {
    pub path: PathBuf,
    /// text of the first `# ...` heading
    pub title: Option<String>,
    /// free text between the title and the first version
    pub preamble: Vec<String>,
    /// version sections in document order
    pub versions: Vec<VersionSection>,
    /// link reference definitions, keyed by lowercased label
    pub links: BTreeMap<String, String>,
    pub format_issues: Vec<Issue>,
    /// lines below the first version that no section, group or entry holds
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped_lines: Vec<usize>,
}

impl Changelog {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            title: None,
            preamble: Vec::new(),
            versions: Vec::new(),
            links: BTreeMap::new(),
            format_issues: Vec::new(),
            dropped_lines: Vec::new(),
        }
    }

    pub fn add_version(&mut self, version_section: VersionSection) {
        self.versions.push(version_section);
    }

    pub fn has_header(&self) -> bool {
        self.title.is_some()
    }

    pub fn has_version(&self, version: &Version) -> bool {
        self.find_version(version).is_some()
    }

    pub fn find_version(&self, version: &Version) -> Option<&VersionSection> {
        self.versions.iter().find(|v| v.version() == Some(version))
    }

    /// look a section up by `latest`, `unreleased`, or a version string
    pub fn find_label(&self, query: &str) -> Option<&VersionSection> {
        match query.trim().to_ascii_lowercase().as_str() {
            "latest" => self.latest_release(),
            "unreleased" => self.unreleased(),
            _ => self.versions.iter().find(|v| v.matches_label(query)),
        }
    }

    /// the topmost version that is not pending
    pub fn latest_release(&self) -> Option<&VersionSection> {
        self.releases().next()
    }

    /// the topmost pending section, if it is above every release
    pub fn unreleased(&self) -> Option<&VersionSection> {
        self.versions.first().filter(|v| v.is_pending())
    }

    pub fn releases(&self) -> impl Iterator<Item = &VersionSection> {
        self.versions.iter().filter(|v| !v.is_pending())
    }

    pub fn entry_count(&self) -> usize {
        self.versions.iter().map(|v| v.entry_count()).sum()
    }

    /// true when rendering reproduces every line of the source
    pub fn is_lossless(&self) -> bool {
        self.dropped_lines.is_empty()
    }

    pub fn link_for(&self, label: &str) -> Option<&String> {
        self.links.get(&label.to_lowercase())
    }

    pub fn is_valid(&self) -> bool {
        self.has_header() && self.format_issues.is_empty()
    }
}

/// lint result for a single changelog file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangelogStatus {
    pub path: PathBuf,
    /// set when the file could not be read
    pub read_error: Option<String>,
    pub format_valid: bool,
    pub version_count: usize,
    pub entry_count: usize,
    pub latest_release: Option<String>,
    pub issues: Vec<Issue>,
    #[serde(skip)]
    pub changelog: Option<Changelog>,
}

impl ChangelogStatus {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            read_error: None,
            format_valid: false,
            version_count: 0,
            entry_count: 0,
            latest_release: None,
            issues: Vec::new(),
            changelog: None,
        }
    }

    pub fn add_issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn needs_attention(&self) -> bool {
        self.read_error.is_some() || !self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.read_error.is_some() || self.issues.iter().any(|i| i.is_error())
    }

    pub fn error_count(&self) -> usize {
        let read_errors = usize::from(self.read_error.is_some());
        read_errors + self.issues.iter().filter(|i| i.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_warning()).count()
    }

    pub fn get_display_status(&self) -> &'static str {
        if self.read_error.is_some() {
            "UNREAD"
        } else if !self.format_valid {
            "FAIL"
        } else if self.warning_count() > 0 {
            "WARN"
        } else {
            "OK"
        }
    }
}

/// overall lint result for a set of changelog files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangelogAnalysis {
    pub statuses: BTreeMap<PathBuf, ChangelogStatus>,
    pub valid_changelogs: Vec<PathBuf>,
    pub invalid_changelogs: Vec<PathBuf>,
    pub total_issues: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl ChangelogAnalysis {
    pub fn new() -> Self {
        Self {
            statuses: BTreeMap::new(),
            valid_changelogs: Vec::new(),
            invalid_changelogs: Vec::new(),
            total_issues: 0,
            total_errors: 0,
            total_warnings: 0,
        }
    }

    pub fn add_status(&mut self, status: ChangelogStatus) {
        let path = status.path.clone();

        if status.has_errors() {
            self.invalid_changelogs.push(path.clone());
        } else {
            self.valid_changelogs.push(path.clone());
        }

        self.total_issues += status.issues.len() + usize::from(status.read_error.is_some());
        self.total_errors += status.error_count();
        self.total_warnings += status.warning_count();
        self.statuses.insert(path, status);
    }

    pub fn all_valid(&self) -> bool {
        self.invalid_changelogs.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    pub fn compliance_percentage(&self) -> f64 {
        let total = self.statuses.len();
        if total == 0 {
            return 100.0;
        }
        (self.valid_changelogs.len() as f64 / total as f64) * 100.0
    }
}

impl Default for ChangelogAnalysis {
    fn default() -> Self {
        Self::new()
    }
}
