// editing operations: cutting a release and adding pending entries

use super::types::{ChangeCategory, ChangeEntry, ChangeGroup, Changelog, VersionSection};
use super::version::{ReleaseDate, VersionLabel};
use crate::error::{Error, Result};
use chrono::NaiveDate;
use semver::Version;

/// parse a `YYYY-MM-DD` release date
pub fn parse_release_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|e| Error::changelog(format!("invalid release date '{}': {}", text, e)))
}

/// turn the top pending section into a dated release
///
/// when the promoted section was `Unreleased`, a fresh empty `Unreleased`
/// section is put back above it
pub fn promote_unreleased(
    changelog: &mut Changelog,
    version: Version,
    date: NaiveDate,
) -> Result<()> {
    let pending = changelog
        .versions
        .first()
        .filter(|section| section.is_pending())
        .ok_or_else(|| Error::changelog("no unreleased section to promote"))?;

    if !pending.has_content() {
        return Err(Error::changelog(format!(
            "section {} has no entries to release",
            pending.raw_label
        )));
    }

    if changelog.versions[1..]
        .iter()
        .any(|section| section.version() == Some(&version))
    {
        return Err(Error::changelog(format!(
            "version {} is already released",
            version
        )));
    }

    if let Some(latest) = changelog.releases().find_map(|s| s.version())
        && &version <= latest
    {
        return Err(Error::changelog(format!(
            "version {} is not newer than the latest release {}",
            version, latest
        )));
    }

    let section = &mut changelog.versions[0];
    let was_unreleased = section.label == VersionLabel::Unreleased;
    let bracketed = section.bracketed;

    log::info!(
        "promoting section {} to {} ({})",
        section.raw_label,
        version,
        date
    );

    section.raw_label = version.to_string();
    section.label = VersionLabel::Release(version);
    section.date = ReleaseDate::Dated(date);

    if was_unreleased {
        let mut unreleased = VersionSection::unreleased(0);
        unreleased.bracketed = bracketed;
        changelog.versions.insert(0, unreleased);
    }

    Ok(())
}

/// append an entry to the pending section, creating the section and the
/// category heading when they do not exist yet
pub fn add_entry(changelog: &mut Changelog, category: ChangeCategory, text: &str) -> Result<()> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::changelog("entry text is empty"));
    }

    if changelog.unreleased().is_none() {
        changelog.versions.insert(0, VersionSection::unreleased(0));
    }

    let section = &mut changelog.versions[0];
    let index = match section
        .groups
        .iter()
        .position(|g| g.category == category && g.parent.is_none())
    {
        Some(index) => index,
        None => {
            section.add_group(ChangeGroup::new(category, None, 0));
            section.groups.len() - 1
        }
    };

    log::debug!(
        "adding entry to {} / {}",
        section.raw_label,
        section.groups[index].category
    );
    section.groups[index].add_entry(ChangeEntry::new(text, 0));

    Ok(())
}
