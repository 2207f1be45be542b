// changelog parser

use super::types::{ChangeCategory, ChangeEntry, ChangeGroup, Changelog, VersionSection};
use super::version::{ReleaseDate, VersionLabel};
use crate::error::{Error, Result};
use crate::utils::severity::{Issue, IssueSeverity, IssueType};
use std::fs;
use std::path::{Path, PathBuf};

const YANKED_MARKER: &str = "[YANKED]";

/// pieces of a `## [label] - date` heading
#[derive(Debug, PartialEq, Eq)]
struct VersionHeading<'a> {
    label: &'a str,
    date: &'a str,
    bracketed: bool,
    yanked: bool,
}

fn split_version_heading(text: &str) -> std::result::Result<VersionHeading<'_>, String> {
    let mut text = text.trim();
    let mut yanked = false;

    if let Some(split) = text.len().checked_sub(YANKED_MARKER.len())
        && text
            .get(split..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(YANKED_MARKER))
    {
        text = text[..split].trim_end();
        yanked = true;
    }

    let (label, rest, bracketed) = if let Some(inside) = text.strip_prefix('[') {
        let close = inside
            .find(']')
            .ok_or("unclosed bracket in version heading")?;
        (inside[..close].trim(), &inside[close + 1..], true)
    } else {
        let end = text
            .find(|c: char| c.is_whitespace() || c == '(')
            .unwrap_or(text.len());
        (&text[..end], &text[end..], false)
    };

    let rest = rest.trim();
    let date = if let Some(inside) = rest.strip_prefix('(') {
        inside.trim_end_matches(')').trim()
    } else {
        rest.trim_start_matches(['-', '\u{2013}', '\u{2014}', ':']).trim()
    };

    Ok(VersionHeading {
        label,
        date,
        bracketed,
        yanked,
    })
}

/// heading level and text, for ATX headings (`## text`)
fn split_heading(trimmed: &str) -> Option<(usize, &str)> {
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }
    Some((level, rest.trim().trim_end_matches('#').trim_end()))
}

/// text of a list item, `None` if the line is not a bullet
fn split_bullet(trimmed: &str) -> Option<&str> {
    if matches!(trimmed, "-" | "*" | "+") {
        return Some("");
    }
    ["- ", "* ", "+ "]
        .iter()
        .find_map(|marker| trimmed.strip_prefix(marker))
        .map(str::trim)
}

/// `[label]: url` link reference definition
fn split_link_definition(trimmed: &str) -> Option<(String, String)> {
    let inside = trimmed.strip_prefix('[')?;
    let close = inside.find("]:")?;
    let label = inside[..close].trim();
    let url = inside[close + 2..].trim();
    if label.is_empty() || url.is_empty() {
        return None;
    }
    Some((label.to_lowercase(), url.to_string()))
}

fn indentation(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LastLine {
    Entry,
    Detail,
    Other,
}

struct ParseState {
    changelog: Changelog,
    current_version: Option<VersionSection>,
    /// category of the last `###` heading, parent of `####` headings
    current_parent: Option<ChangeCategory>,
    /// set while inside a section whose heading could not be parsed
    skipping_section: bool,
    seen_version: bool,
    in_code_block: bool,
    last_line: LastLine,
}

impl ParseState {
    fn new(path: PathBuf) -> Self {
        Self {
            changelog: Changelog::new(path),
            current_version: None,
            current_parent: None,
            skipping_section: false,
            seen_version: false,
            in_code_block: false,
            last_line: LastLine::Other,
        }
    }

    fn issue(&mut self, issue_type: IssueType, line_number: usize, message: String) {
        let issue = Issue::new(IssueSeverity::Error, issue_type, message).at_line(line_number);
        self.changelog.format_issues.push(issue);
    }

    /// a line inside the versions that nothing in the model holds
    fn drop_line(&mut self, line_number: usize) {
        self.changelog.dropped_lines.push(line_number);
    }

    fn push_preamble(&mut self, line: &str) {
        self.changelog.preamble.push(line.trim_end().to_string());
    }

    fn finish_version(&mut self) {
        if let Some(section) = self.current_version.take() {
            self.changelog.add_version(section);
        }
        self.current_parent = None;
    }

    fn current_group(&mut self) -> Option<&mut ChangeGroup> {
        self.current_version
            .as_mut()
            .and_then(|v| v.groups.last_mut())
    }

    fn last_entry(&mut self) -> Option<&mut ChangeEntry> {
        self.current_group().and_then(|g| g.entries.last_mut())
    }

    fn handle_heading(&mut self, line: &str, level: usize, text: &str, line_number: usize) {
        self.last_line = LastLine::Other;

        match level {
            1 if self.seen_version => self.drop_line(line_number),
            1 if self.changelog.title.is_none() => {
                self.changelog.title = Some(text.to_string());
            }
            1 => self.push_preamble(line),
            2 => self.handle_version_heading(text, line_number),
            _ => self.handle_category_heading(line, level, text, line_number),
        }
    }

    fn handle_version_heading(&mut self, text: &str, line_number: usize) {
        self.finish_version();
        self.seen_version = true;
        self.skipping_section = false;

        let heading = match split_version_heading(text) {
            Ok(heading) => heading,
            Err(reason) => {
                self.skipping_section = true;
                self.drop_line(line_number);
                self.issue(IssueType::InvalidVersion, line_number, reason);
                return;
            }
        };

        let label = match VersionLabel::parse(heading.label) {
            Ok(label) => label,
            Err(reason) => {
                self.skipping_section = true;
                self.drop_line(line_number);
                self.issue(IssueType::InvalidVersion, line_number, reason);
                return;
            }
        };

        let date = match ReleaseDate::parse(heading.date) {
            Ok(date) => date,
            Err(reason) => {
                self.issue(
                    IssueType::InvalidDate,
                    line_number,
                    format!("version {}: {}", heading.label, reason),
                );
                ReleaseDate::Missing
            }
        };

        let mut section = VersionSection::new(label, heading.label, date, line_number);
        section.bracketed = heading.bracketed;
        section.yanked = heading.yanked;
        self.current_version = Some(section);
    }

    fn handle_category_heading(
        &mut self,
        line: &str,
        level: usize,
        text: &str,
        line_number: usize,
    ) {
        if self.skipping_section {
            self.drop_line(line_number);
            return;
        }

        let category = ChangeCategory::parse(text);

        let parent = if level == 3 {
            self.current_parent = Some(category.clone());
            None
        } else {
            self.current_parent.clone()
        };

        match self.current_version.as_mut() {
            Some(version) => {
                version.add_group(ChangeGroup::new(category, parent, line_number));
            }
            None => {
                self.push_preamble(line);
                self.issue(
                    IssueType::OrphanCategory,
                    line_number,
                    format!("category '{}' found outside of a version section", text),
                );
            }
        }
    }

    fn handle_bullet(&mut self, line: &str, text: &str, line_number: usize) {
        if !self.seen_version {
            self.push_preamble(line);
            self.issue(
                IssueType::OrphanEntry,
                line_number,
                "entry found before the first version section".to_string(),
            );
            return;
        }
        if self.skipping_section {
            self.drop_line(line_number);
            return;
        }

        if indentation(line) >= 2
            && !text.is_empty()
            && let Some(entry) = self.last_entry()
        {
            entry.details.push(text.to_string());
            self.last_line = LastLine::Detail;
            return;
        }

        let Some(version) = self.current_version.as_ref() else {
            return;
        };
        let version_label = version.raw_label.clone();

        if version.groups.is_empty() {
            self.last_line = LastLine::Other;
            self.drop_line(line_number);
            self.issue(
                IssueType::OrphanEntry,
                line_number,
                format!(
                    "entry found outside of a category in version {}",
                    version_label
                ),
            );
            return;
        }

        if text.is_empty() {
            self.last_line = LastLine::Other;
            self.issue(
                IssueType::EmptyEntry,
                line_number,
                format!("empty entry in version {}", version_label),
            );
            return;
        }

        if let Some(group) = self.current_group() {
            group.add_entry(ChangeEntry::new(text, line_number));
            self.last_line = LastLine::Entry;
        }
    }

    fn handle_text(&mut self, line: &str, trimmed: &str, line_number: usize) {
        if !self.seen_version {
            self.push_preamble(line);
            return;
        }

        // lazy continuation of the previous bullet
        match self.last_line {
            LastLine::Entry => {
                if let Some(entry) = self.last_entry() {
                    entry.text.push(' ');
                    entry.text.push_str(trimmed);
                }
            }
            LastLine::Detail => {
                if let Some(detail) = self.last_entry().and_then(|e| e.details.last_mut()) {
                    detail.push(' ');
                    detail.push_str(trimmed);
                }
            }
            LastLine::Other => self.drop_line(line_number),
        }
    }

    fn handle_line(&mut self, line: &str, line_number: usize) {
        let trimmed = line.trim();

        let fence = trimmed.starts_with("```") || trimmed.starts_with("~~~");
        if fence {
            self.in_code_block = !self.in_code_block;
            self.last_line = LastLine::Other;
        }

        if fence || self.in_code_block {
            if self.seen_version {
                self.drop_line(line_number);
            } else {
                self.push_preamble(line);
            }
            return;
        }

        if trimmed.is_empty() {
            self.last_line = LastLine::Other;
            if !self.seen_version && self.changelog.title.is_some() {
                self.changelog.preamble.push(String::new());
            }
            return;
        }

        if let Some((level, text)) = split_heading(trimmed) {
            self.handle_heading(line, level, text, line_number);
            return;
        }

        if indentation(line) < 4
            && let Some((label, url)) = split_link_definition(trimmed)
        {
            self.last_line = LastLine::Other;
            self.changelog.links.insert(label, url);
            return;
        }

        if let Some(text) = split_bullet(trimmed) {
            self.handle_bullet(line, text, line_number);
            return;
        }

        self.handle_text(line, trimmed, line_number);
    }

    fn finish(mut self) -> Changelog {
        self.finish_version();

        let preamble = &mut self.changelog.preamble;
        while preamble.last().is_some_and(|l| l.trim().is_empty()) {
            preamble.pop();
        }
        let leading = preamble
            .iter()
            .take_while(|l| l.trim().is_empty())
            .count();
        preamble.drain(..leading);

        self.changelog
    }
}

/// parse a changelog file
pub fn parse_changelog<P: AsRef<Path>>(path: P) -> Result<Changelog> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(parse_changelog_str(&content, path))
}

/// parse changelog text; structural problems end up in `format_issues`
pub fn parse_changelog_str<P: AsRef<Path>>(content: &str, path: P) -> Changelog {
    let path = path.as_ref();
    let mut state = ParseState::new(path.to_path_buf());

    for (index, line) in content.lines().enumerate() {
        state.handle_line(line, index + 1);
    }

    let changelog = state.finish();
    log::debug!(
        "parsed {}: {} versions, {} entries, {} format issues",
        path.display(),
        changelog.versions.len(),
        changelog.entry_count(),
        changelog.format_issues.len()
    );
    changelog
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;

    fn parse(content: &str) -> Changelog {
        parse_changelog_str(content, "CHANGELOG.md")
    }

    #[test]
    fn test_split_version_heading_keep_a_changelog() {
        let heading = split_version_heading("[0.0.14] - 2023-10-11").unwrap();
        assert_eq!(heading.label, "0.0.14");
        assert_eq!(heading.date, "2023-10-11");
        assert!(heading.bracketed);
        assert!(!heading.yanked);
    }

    #[test]
    fn test_split_version_heading_variants() {
        let heading = split_version_heading("v1.2.0 (2024-01-02)").unwrap();
        assert_eq!(heading.label, "v1.2.0");
        assert_eq!(heading.date, "2024-01-02");
        assert!(!heading.bracketed);

        let heading = split_version_heading("[0.1.0] - 2024-01-02 [YANKED]").unwrap();
        assert!(heading.yanked);
        assert_eq!(heading.date, "2024-01-02");

        let heading = split_version_heading("[Unreleased]").unwrap();
        assert_eq!(heading.label, "Unreleased");
        assert_eq!(heading.date, "");

        assert!(split_version_heading("[0.1.0 - 2024-01-02").is_err());
    }

    #[test]
    fn test_split_bullet_ignores_emphasis_and_rules() {
        assert_eq!(split_bullet("- added reader"), Some("added reader"));
        assert_eq!(split_bullet("* fixed io"), Some("fixed io"));
        assert_eq!(split_bullet("**bold**"), None);
        assert_eq!(split_bullet("---"), None);
        assert_eq!(split_bullet("-"), Some(""));
    }

    #[test]
    fn test_parse_nested_categories() {
        let changelog = parse(
            "# Changelog\n\
             \n\
             ## [0.0.14] - 2023-10-11\n\
             \n\
             ### Added\n\
             \n\
             #### Minor\n\
             \n\
             - Added `SpatialData.subset()` API\n\
             \n\
             #### Technical\n\
             \n\
             - Decoupled transformations from io\n\
             \n\
             ### Fixed\n\
             \n\
             - Fixed bug with `get_extent()`\n",
        );

        assert!(changelog.format_issues.is_empty());
        assert_eq!(changelog.title.as_deref(), Some("Changelog"));
        assert_eq!(changelog.versions.len(), 1);

        let version = &changelog.versions[0];
        assert_eq!(version.version(), Some(&Version::new(0, 0, 14)));
        assert_eq!(version.groups.len(), 4);
        assert_eq!(version.groups[1].category, ChangeCategory::Minor);
        assert_eq!(version.groups[1].parent, Some(ChangeCategory::Added));
        assert_eq!(version.groups[3].category, ChangeCategory::Fixed);
        assert_eq!(version.groups[3].parent, None);
        assert_eq!(version.entry_count(), 3);
    }

    #[test]
    fn test_parse_continuations_and_details() {
        let changelog = parse(
            "# Changelog\n\
             ## [0.1.0] - 2024-01-01\n\
             ### Added\n\
             - first line\n\
             \x20 wrapped here\n\
             \x20 - nested detail\n\
             - second\n",
        );

        let entries: Vec<_> = changelog.versions[0].entries().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "first line wrapped here");
        assert_eq!(entries[0].details, vec!["nested detail".to_string()]);
        assert_eq!(entries[1].line_number, 7);
    }

    #[test]
    fn test_parse_orphan_entry_and_category() {
        let changelog = parse(
            "# Changelog\n\
             ## [0.1.0] - 2024-01-01\n\
             - not under a category\n",
        );
        assert_eq!(changelog.format_issues.len(), 1);
        assert_eq!(changelog.format_issues[0].issue_type, IssueType::OrphanEntry);
        assert_eq!(changelog.format_issues[0].line, Some(3));

        let changelog = parse("# Changelog\n### Added\n- entry\n");
        let types: Vec<_> = changelog.format_issues.iter().map(|i| i.issue_type).collect();
        assert_eq!(types, vec![IssueType::OrphanCategory, IssueType::OrphanEntry]);
        assert_eq!(changelog.preamble, vec!["### Added", "- entry"]);
    }

    #[test]
    fn test_parse_invalid_version_skips_section() {
        let changelog = parse(
            "# Changelog\n\
             ## [next] - tbd\n\
             ### Added\n\
             - skipped\n\
             ## [0.1.0] - 2024-01-01\n\
             ### Added\n\
             - kept\n",
        );
        assert_eq!(changelog.format_issues.len(), 1);
        assert_eq!(
            changelog.format_issues[0].issue_type,
            IssueType::InvalidVersion
        );
        assert_eq!(changelog.versions.len(), 1);
        assert_eq!(changelog.entry_count(), 1);
    }

    #[test]
    fn test_parse_records_dropped_lines() {
        let changelog = parse(
            "# Changelog\n\
             ## [0.1.0.post1] - 2024-02-01\n\
             ### Fixed\n\
             - hotfix\n\
             ## [0.1.0] - 2024-01-01\n\
             Thanks to everyone who tested the beta.\n\
             ### Added\n\
             - entry\n",
        );
        assert_eq!(changelog.dropped_lines, vec![2, 3, 4, 6]);
        assert!(!changelog.is_lossless());

        let changelog = parse("# Changelog\n## [0.1.0] - 2024-01-01\n### Added\n- entry\n");
        assert!(changelog.is_lossless());
    }

    #[test]
    fn test_parse_bullet_before_first_version() {
        let changelog = parse(
            "# Changelog\n\
             \n\
             - stray bullet\n\
             \n\
             ## [0.1.0] - 2024-01-01\n\
             ### Added\n\
             - entry\n",
        );
        assert_eq!(changelog.format_issues.len(), 1);
        assert_eq!(changelog.format_issues[0].issue_type, IssueType::OrphanEntry);
        assert_eq!(changelog.format_issues[0].line, Some(3));
        assert_eq!(changelog.preamble, vec!["- stray bullet".to_string()]);
        assert!(changelog.is_lossless());
    }

    #[test]
    fn test_parse_invalid_date_keeps_section() {
        let changelog = parse("# Changelog\n## [0.1.0] - someday\n### Added\n- entry\n");
        assert_eq!(changelog.format_issues[0].issue_type, IssueType::InvalidDate);
        assert_eq!(changelog.versions[0].date, ReleaseDate::Missing);
        assert_eq!(changelog.entry_count(), 1);
    }

    #[test]
    fn test_parse_preamble_and_links() {
        let changelog = parse(
            "# Changelog\n\
             \n\
             All notable changes to this project will be documented in this file.\n\
             \n\
             The format is based on [Keep a Changelog][].\n\
             \n\
             [keep a changelog]: https://keepachangelog.com/en/1.0.0/\n\
             \n\
             ## [0.1.0] - 2024-01-01\n\
             ### Added\n\
             - entry\n\
             \n\
             [0.1.0]: https://example.org/releases/0.1.0\n",
        );

        assert_eq!(
            changelog.preamble,
            vec![
                "All notable changes to this project will be documented in this file.".to_string(),
                String::new(),
                "The format is based on [Keep a Changelog][].".to_string(),
            ]
        );
        assert_eq!(changelog.links.len(), 2);
        assert!(changelog.link_for("0.1.0").is_some());
        assert!(changelog.link_for("Keep a Changelog").is_some());
    }

    #[test]
    fn test_parse_ignores_code_blocks() {
        let changelog = parse(
            "# Changelog\n\
             ## [0.1.0] - 2024-01-01\n\
             ### Added\n\
             - entry\n\
             ```\n\
             ## not a heading\n\
             - not an entry\n\
             ```\n",
        );
        assert_eq!(changelog.versions.len(), 1);
        assert_eq!(changelog.entry_count(), 1);
    }

    #[test]
    fn test_parse_changelog_missing_file() {
        let result = parse_changelog("/nonexistent/CHANGELOG.md");
        assert!(matches!(result, Err(Error::FileReadError { .. })));
    }
}
