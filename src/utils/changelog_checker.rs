use super::config::ChangelintConfig;
use super::discovery::ChangelogDiscovery;
use crate::error::Result;
use crate::utils::changelog::{
    ChangelogAnalysis, ChangelogStatus, parse_changelog, validate_changelog,
};
use crate::utils::severity::{Issue, IssueSeverity};
use std::path::Path;

const MIN_FILE_NAME_WIDTH: usize = 12;

impl ChangelogAnalysis {
    fn name_width<'a>(paths: impl Iterator<Item = &'a Path>) -> usize {
        paths
            .map(|p| p.display().to_string().len())
            .max()
            .unwrap_or(MIN_FILE_NAME_WIDTH)
            .max(MIN_FILE_NAME_WIDTH)
    }

    /// display changelog analysis in table format
    pub fn display_table(&self) {
        if self.statuses.is_empty() {
            println!("no changelogs found.");
            return;
        }

        println!("changelog analysis:");
        println!("  total changelogs analyzed: {}", self.statuses.len());
        println!("  valid changelogs: {}", self.valid_changelogs.len());
        println!("  changelogs with errors: {}", self.invalid_changelogs.len());
        println!("  compliance: {:.1}%", self.compliance_percentage());
        println!();

        let name_width = Self::name_width(self.statuses.keys().map(|p| p.as_path()));

        println!(
            "  {:<name_width$}  {:>8}  {:>7}  {:>10}  {:>6}  {:>8}  {:>6}",
            "Changelog",
            "Versions",
            "Entries",
            "Latest",
            "Errors",
            "Warnings",
            "Status",
            name_width = name_width
        );

        println!(
            "  {}  --------  -------  ----------  ------  --------  ------",
            "-".repeat(name_width)
        );

        // issues first, then by path
        let mut entries: Vec<_> = self.statuses.values().collect();
        entries.sort_by_key(|s| (!s.needs_attention(), s.path.clone()));

        for status in entries {
            println!(
                "  {:<name_width$}  {:>8}  {:>7}  {:>10}  {:>6}  {:>8}  {:>6}",
                status.path.display(),
                status.version_count,
                status.entry_count,
                status.latest_release.as_deref().unwrap_or("-"),
                status.error_count(),
                status.warning_count(),
                status.get_display_status(),
                name_width = name_width
            );
        }

        println!();
    }

    fn display_issue_table(title: &str, issues: &[(&ChangelogStatus, &Issue)]) {
        println!("{}:", title);

        let name_width = Self::name_width(issues.iter().map(|(s, _)| s.path.as_path()));

        println!(
            "  {:<name_width$}  {:>5}  Issue",
            "Changelog",
            "Line",
            name_width = name_width
        );
        println!("  {}  -----  -----", "-".repeat(name_width));

        for (status, issue) in issues {
            let line = issue
                .line
                .map(|l| l.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:<name_width$}  {:>5}  {}",
                status.path.display(),
                line,
                issue.message,
                name_width = name_width
            );
        }
        println!();
    }

    /// display detailed changelog issues split by severity
    pub fn display_issues(&self) {
        let mut errors: Vec<(&ChangelogStatus, &Issue)> = Vec::new();
        let mut warnings: Vec<(&ChangelogStatus, &Issue)> = Vec::new();

        for status in self.statuses.values() {
            for issue in &status.issues {
                if issue.severity == IssueSeverity::Error {
                    errors.push((status, issue));
                } else {
                    warnings.push((status, issue));
                }
            }
        }

        let unreadable: Vec<_> = self
            .statuses
            .values()
            .filter_map(|s| s.read_error.as_ref().map(|e| (s, e)))
            .collect();

        if errors.is_empty() && warnings.is_empty() && unreadable.is_empty() {
            println!("no changelog issues found.");
            return;
        }

        for (status, error) in unreadable {
            println!("{}: {}", status.path.display(), error);
        }

        if !errors.is_empty() {
            Self::display_issue_table("changelog errors", &errors);
        }

        if !warnings.is_empty() {
            Self::display_issue_table("changelog warnings", &warnings);
        }
    }

    /// display compliance summary
    pub fn display_summary(&self) {
        if self.all_valid() {
            println!(
                "all changelogs are compliant ({} warning(s))",
                self.total_warnings
            );
        } else {
            println!(
                "changelog compliance: {:.1}% ({}/{} changelogs)",
                self.compliance_percentage(),
                self.valid_changelogs.len(),
                self.statuses.len()
            );
            println!(
                "  total issues: {} ({} error(s), {} warning(s))",
                self.total_issues, self.total_errors, self.total_warnings
            );
        }
    }
}

/// changelog checker for analyzing changelog compliance
pub struct ChangelogChecker;

impl ChangelogChecker {
    /// parse and validate a single changelog file
    ///
    /// read failures are recorded on the status rather than returned
    pub fn check_file<P: AsRef<Path>>(path: P, config: &ChangelintConfig) -> ChangelogStatus {
        let path = path.as_ref();
        let mut status = ChangelogStatus::new(path.to_path_buf());

        let changelog = match parse_changelog(path) {
            Ok(changelog) => changelog,
            Err(e) => {
                log::warn!("{}", e);
                status.read_error = Some(e.to_string());
                return status;
            }
        };

        for issue in validate_changelog(&changelog, &config.changelog, &config.severity) {
            status.add_issue(issue);
        }

        status.format_valid = !status.has_errors();
        status.version_count = changelog.versions.len();
        status.entry_count = changelog.entry_count();
        status.latest_release = changelog.latest_release().map(|s| s.raw_label.clone());
        status.changelog = Some(changelog);

        log::debug!(
            "checked {}: {} error(s), {} warning(s)",
            path.display(),
            status.error_count(),
            status.warning_count()
        );
        status
    }

    /// check a list of changelog files
    pub fn check_files<P: AsRef<Path>>(
        paths: &[P],
        config: &ChangelintConfig,
    ) -> ChangelogAnalysis {
        let mut analysis = ChangelogAnalysis::new();
        for path in paths {
            analysis.add_status(Self::check_file(path, config));
        }
        analysis
    }

    /// find and check every changelog below `root`
    pub fn scan<P: AsRef<Path>>(
        root: P,
        config: &ChangelintConfig,
    ) -> Result<ChangelogAnalysis> {
        let paths = ChangelogDiscovery::new(root).find(&config.changelog.changelog_file_name)?;
        Ok(Self::check_files(&paths, config))
    }
}
