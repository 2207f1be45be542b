// canonical markdown output

use super::types::{ChangeGroup, Changelog, VersionSection};
use super::version::ReleaseDate;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// heading line for a version section, without the `## ` prefix
pub fn version_heading(section: &VersionSection) -> String {
    let mut heading = if section.bracketed {
        format!("[{}]", section.raw_label)
    } else {
        section.raw_label.clone()
    };

    if section.date != ReleaseDate::Missing {
        heading.push_str(" - ");
        heading.push_str(&section.date.to_string());
    }

    if section.yanked {
        heading.push_str(" [YANKED]");
    }

    heading
}

fn push_block(lines: &mut Vec<String>, block: Vec<String>) {
    if block.is_empty() {
        return;
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.extend(block);
}

fn group_lines(group: &ChangeGroup) -> Vec<String> {
    let marker = if group.is_nested() { "####" } else { "###" };
    let mut lines = vec![format!("{} {}", marker, group.category)];

    if !group.entries.is_empty() {
        lines.push(String::new());
    }
    for entry in &group.entries {
        lines.push(format!("- {}", entry.text));
        lines.extend(entry.details.iter().map(|d| format!("  - {}", d)));
    }

    lines
}

fn version_lines(section: &VersionSection) -> Vec<String> {
    let mut lines = vec![format!("## {}", version_heading(section))];
    for group in &section.groups {
        push_block(&mut lines, group_lines(group));
    }
    lines
}

/// render one version section, e.g. as release notes
pub fn render_version(section: &VersionSection) -> String {
    let mut output = version_lines(section).join("\n");
    output.push('\n');
    output
}

/// render the whole changelog in canonical form: one blank line between
/// blocks, `-` bullets, link references sorted at the bottom
pub fn render_changelog(changelog: &Changelog) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(title) = &changelog.title {
        lines.push(format!("# {}", title));
    }

    push_block(&mut lines, changelog.preamble.clone());

    for section in &changelog.versions {
        push_block(&mut lines, version_lines(section));
    }

    let links: Vec<String> = changelog
        .links
        .iter()
        .map(|(label, url)| format!("[{}]: {}", label, url))
        .collect();
    push_block(&mut lines, links);

    let mut output = lines.join("\n");
    output.push('\n');
    output
}

/// true when `content` is exactly the canonical rendering of its parse
pub fn is_canonical(content: &str, changelog: &Changelog) -> bool {
    render_changelog(changelog) == content
}

/// write the canonical rendering of `changelog` to `path`
///
/// refuses when the parsed changelog dropped lines, since the rewrite would
/// delete them from the file
pub fn write_changelog<P: AsRef<Path>>(path: P, changelog: &Changelog) -> Result<()> {
    let path = path.as_ref();
    if !changelog.is_lossless() {
        let lines: Vec<String> = changelog
            .dropped_lines
            .iter()
            .map(|l| l.to_string())
            .collect();
        return Err(Error::changelog(format!(
            "refusing to rewrite {}: line(s) {} are not part of any entry, fix them first",
            path.display(),
            lines.join(", ")
        )));
    }

    fs::write(path, render_changelog(changelog)).map_err(|e| Error::FileWriteError {
        path: path.to_path_buf(),
        source: e,
    })?;
    log::info!("wrote {}", path.display());
    Ok(())
}
