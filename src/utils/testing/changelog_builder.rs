// builder for changelog text used in tests

/// a version section to be written
#[derive(Debug, Clone)]
pub struct TestVersion {
    pub label: String,
    pub date: Option<String>,
    pub groups: Vec<(String, Vec<String>)>,
}

impl TestVersion {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            date: None,
            groups: Vec::new(),
        }
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// add a `###` heading with bullets; use `"Added/Minor"` for a nested
    /// `####` heading below `### Added`
    pub fn group(mut self, heading: impl Into<String>, entries: &[&str]) -> Self {
        self.groups.push((
            heading.into(),
            entries.iter().map(|e| e.to_string()).collect(),
        ));
        self
    }
}

/// builder for changelog markdown
#[derive(Debug, Clone)]
pub struct TestChangelogBuilder {
    title: Option<String>,
    preamble: Vec<String>,
    versions: Vec<TestVersion>,
    links: Vec<(String, String)>,
}

impl TestChangelogBuilder {
    pub fn new() -> Self {
        Self {
            title: Some("Changelog".to_string()),
            preamble: Vec::new(),
            versions: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn no_title(mut self) -> Self {
        self.title = None;
        self
    }

    pub fn preamble(mut self, line: impl Into<String>) -> Self {
        self.preamble.push(line.into());
        self
    }

    pub fn version(mut self, version: TestVersion) -> Self {
        self.versions.push(version);
        self
    }

    pub fn link(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.links.push((label.into(), url.into()));
        self
    }

    pub fn build(&self) -> String {
        let mut out = String::new();

        if let Some(title) = &self.title {
            out.push_str(&format!("# {}\n\n", title));
        }
        for line in &self.preamble {
            out.push_str(line);
            out.push('\n');
        }
        if !self.preamble.is_empty() {
            out.push('\n');
        }

        for version in &self.versions {
            match &version.date {
                Some(date) => out.push_str(&format!("## [{}] - {}\n\n", version.label, date)),
                None => out.push_str(&format!("## [{}]\n\n", version.label)),
            }

            let mut open_parent: Option<&str> = None;
            for (heading, entries) in &version.groups {
                match heading.split_once('/') {
                    Some((parent, child)) => {
                        if open_parent != Some(parent) {
                            out.push_str(&format!("### {}\n\n", parent));
                            open_parent = Some(parent);
                        }
                        out.push_str(&format!("#### {}\n\n", child));
                    }
                    None => {
                        out.push_str(&format!("### {}\n\n", heading));
                        open_parent = Some(heading.as_str());
                    }
                }
                for entry in entries {
                    out.push_str(&format!("- {}\n", entry));
                }
                out.push('\n');
            }
        }

        for (label, url) in &self.links {
            out.push_str(&format!("[{}]: {}\n", label, url));
        }

        out
    }
}

impl Default for TestChangelogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
