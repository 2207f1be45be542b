use super::changelog::ChangelogConfig;
use super::severity_config::SeverityConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "changelint.toml";

/// main configuration for changelint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelintConfig {
    /// changelog-related configuration
    #[serde(default)]
    pub changelog: ChangelogConfig,

    /// severity per issue type
    #[serde(default)]
    pub severity: SeverityConfig,
}

impl ChangelintConfig {
    /// load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| Error::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: ChangelintConfig =
            toml::from_str(&contents).map_err(|e| Error::TomlParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// find and load configuration file in a directory
    ///
    /// looks for `changelint.toml` in the given directory
    /// returns default config if file is not found
    pub fn load_or_default<P: AsRef<Path>>(root: P) -> Self {
        match Self::find_config_file(&root) {
            Some(config_path) => Self::load_from_file(&config_path).unwrap_or_else(|e| {
                log::warn!("ignoring invalid configuration: {}", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// load an explicitly requested file, or look for one in `root`
    ///
    /// an explicit path must exist and parse; a file found in `root` falls
    /// back to the defaults when invalid
    pub fn load<P: AsRef<Path>>(explicit: Option<&Path>, root: P) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::load_or_default(root)),
        }
    }

    /// find configuration file in a directory
    pub fn find_config_file<P: AsRef<Path>>(root: P) -> Option<PathBuf> {
        let config_path = root.as_ref().join(CONFIG_FILE_NAME);

        if config_path.is_file() {
            Some(config_path)
        } else {
            None
        }
    }
}
