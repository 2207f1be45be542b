// locating changelog files in a directory tree

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// directories never descended into
const SKIPPED_DIRECTORIES: [&str; 3] = ["target", "node_modules", "__pycache__"];

pub struct ChangelogDiscovery {
    pub root_path: PathBuf,
}

impl ChangelogDiscovery {
    pub fn new<P: AsRef<Path>>(root_path: P) -> Self {
        ChangelogDiscovery {
            root_path: root_path.as_ref().to_path_buf(),
        }
    }

    /// find every file below the root named `file_name` (case-insensitive),
    /// sorted by path
    pub fn find(&self, file_name: &str) -> Result<Vec<PathBuf>> {
        if !self.root_path.is_dir() {
            return Err(Error::DirectoryNotFound {
                path: self.root_path.clone(),
            });
        }

        let mut found = Vec::new();
        Self::find_recursive(&self.root_path, file_name, &mut found)?;
        found.sort();

        log::debug!(
            "found {} file(s) named {} below {}",
            found.len(),
            file_name,
            self.root_path.display()
        );
        Ok(found)
    }

    fn find_recursive(directory: &Path, file_name: &str, found: &mut Vec<PathBuf>) -> Result<()> {
        let entries = fs::read_dir(directory)?;

        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            let name = entry.file_name();
            let name = name.to_string_lossy();

            // symlinked directories may point back up the tree
            if entry.file_type()?.is_symlink() && path.is_dir() {
                log::debug!("not following directory symlink {}", path.display());
                continue;
            }

            if path.is_file() {
                if name.eq_ignore_ascii_case(file_name) {
                    found.push(path);
                }
            } else if path.is_dir() {
                if Self::should_skip(&name) {
                    continue;
                }
                // unreadable subdirectories do not abort the scan
                if let Err(e) = Self::find_recursive(&path, file_name, found) {
                    log::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }

        Ok(())
    }

    fn should_skip(directory_name: &str) -> bool {
        directory_name.starts_with('.') || SKIPPED_DIRECTORIES.contains(&directory_name)
    }
}
