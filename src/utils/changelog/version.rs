// version labels and release dates of changelog sections

use chrono::NaiveDate;
use semver::{Prerelease, Version};
use serde::{Deserialize, Serialize};
use std::fmt;

/// label of a `## ...` version heading
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum VersionLabel {
    /// the literal `Unreleased` section
    Unreleased,
    /// wildcard version such as `0.0.x`, used as a bucket for the next release
    Placeholder(String),
    /// concrete version
    Release(Version),
}

impl VersionLabel {
    /// parse a heading label such as `0.1.0`, `v1.2.3-rc.1`, `0.1.0.dev1`,
    /// `0.0.x` or `Unreleased`
    pub fn parse(text: &str) -> Result<Self, String> {
        let text = text.trim();
        if text.is_empty() {
            return Err("empty version label".to_string());
        }

        if text.eq_ignore_ascii_case("unreleased") {
            return Ok(VersionLabel::Unreleased);
        }

        let text = strip_v_prefix(text);

        if is_placeholder(text) {
            return Ok(VersionLabel::Placeholder(text.to_string()));
        }

        if let Ok(version) = Version::parse(text) {
            return Ok(VersionLabel::Release(version));
        }

        parse_loose_version(text)
            .map(VersionLabel::Release)
            .ok_or_else(|| format!("could not parse version from '{}'", text))
    }

    pub fn is_released(&self) -> bool {
        matches!(self, VersionLabel::Release(_))
    }

    pub fn as_version(&self) -> Option<&Version> {
        match self {
            VersionLabel::Release(version) => Some(version),
            _ => None,
        }
    }
}

impl fmt::Display for VersionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionLabel::Unreleased => write!(f, "Unreleased"),
            VersionLabel::Placeholder(text) => write!(f, "{}", text),
            VersionLabel::Release(version) => write!(f, "{}", version),
        }
    }
}

fn strip_v_prefix(text: &str) -> &str {
    match text.strip_prefix(['v', 'V']) {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
        _ => text,
    }
}

fn is_placeholder(text: &str) -> bool {
    let parts: Vec<&str> = text.split('.').collect();
    let mut has_wildcard = false;

    for part in &parts {
        match *part {
            "x" | "X" | "*" => has_wildcard = true,
            p if !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()) => {}
            _ => return false,
        }
    }

    has_wildcard && parts.len() <= 3
}

/// accepts versions semver rejects: two components (`0.1`) and python-style
/// pre-release suffixes (`0.1.0.dev1`, `1.0.0rc2`, `1.0.0a1`)
fn parse_loose_version(text: &str) -> Option<Version> {
    let split_at = text
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(text.len());
    let (release, suffix) = text.split_at(split_at);
    let release = release.trim_end_matches('.');

    let numbers: Vec<u64> = release
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;

    let (major, minor, patch) = match numbers.as_slice() {
        [major, minor] => (*major, *minor, 0),
        [major, minor, patch] => (*major, *minor, *patch),
        _ => return None,
    };

    let mut version = Version::new(major, minor, patch);

    let suffix = suffix.trim_start_matches(['.', '-', '_']);
    if !suffix.is_empty() {
        version.pre = python_prerelease(suffix)?;
    }

    Some(version)
}

fn python_prerelease(suffix: &str) -> Option<Prerelease> {
    let digits_at = suffix
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(suffix.len());
    let (tag, number) = suffix.split_at(digits_at);
    let tag = tag.trim_end_matches(['.', '-', '_']).to_ascii_lowercase();

    let tag = match tag.as_str() {
        "dev" => "dev",
        "a" | "alpha" => "a",
        "b" | "beta" => "b",
        "rc" | "c" | "pre" | "preview" => "rc",
        _ => return None,
    };

    let identifier = if number.is_empty() {
        tag.to_string()
    } else {
        format!("{}.{}", tag, number.parse::<u64>().ok()?)
    };

    Prerelease::new(&identifier).ok()
}

/// release date written after a version label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ReleaseDate {
    Dated(NaiveDate),
    /// `tbd` and friends: release is planned but not dated
    Tbd,
    Missing,
}

impl ReleaseDate {
    pub fn parse(text: &str) -> Result<Self, String> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(ReleaseDate::Missing);
        }

        match text.to_ascii_lowercase().as_str() {
            "tbd" | "tba" | "unreleased" | "upcoming" => return Ok(ReleaseDate::Tbd),
            _ => {}
        }

        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(ReleaseDate::Dated)
            .map_err(|_| format!("could not parse date from '{}'", text))
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            ReleaseDate::Dated(date) => Some(*date),
            _ => None,
        }
    }

    pub fn is_dated(&self) -> bool {
        matches!(self, ReleaseDate::Dated(_))
    }
}

impl fmt::Display for ReleaseDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseDate::Dated(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            ReleaseDate::Tbd => write!(f, "tbd"),
            ReleaseDate::Missing => Ok(()),
        }
    }
}
