// changelog configuration

use super::types::ChangeCategory;
use serde::{Deserialize, Serialize};

/// configuration for changelog linting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// name of the changelog file (default: "CHANGELOG.md")
    pub changelog_file_name: String,

    /// require a top-level `# ...` title
    pub require_header: bool,

    /// require released versions to carry a date
    pub require_dates: bool,

    /// require a link reference for every bracketed release heading
    pub require_links: bool,

    /// allowed category headings (empty list allows all)
    pub allowed_categories: Vec<ChangeCategory>,
}

impl ChangelogConfig {
    /// create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changelog_file_name(mut self, name: impl Into<String>) -> Self {
        self.changelog_file_name = name.into();
        self
    }

    pub fn require_header(mut self, required: bool) -> Self {
        self.require_header = required;
        self
    }

    pub fn require_dates(mut self, required: bool) -> Self {
        self.require_dates = required;
        self
    }

    pub fn require_links(mut self, required: bool) -> Self {
        self.require_links = required;
        self
    }

    pub fn allowed_categories(mut self, categories: Vec<ChangeCategory>) -> Self {
        self.allowed_categories = categories;
        self
    }

    /// check if a category heading is allowed
    pub fn is_allowed_category(&self, category: &ChangeCategory) -> bool {
        if self.allowed_categories.is_empty() {
            return true; // if no restrictions, allow all
        }
        self.allowed_categories.contains(category)
    }
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            changelog_file_name: "CHANGELOG.md".to_string(),
            require_header: true,
            require_dates: true,
            require_links: false,
            allowed_categories: ChangeCategory::KNOWN.to_vec(),
        }
    }
}
