// builder for directory trees containing changelogs

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// a directory tree on disk, removed when dropped
pub struct TestTree {
    pub path: PathBuf,
    _temp_dir: TempDir,
}

impl TestTree {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.path.join(relative)
    }

    pub fn read(&self, relative: impl AsRef<Path>) -> std::io::Result<String> {
        fs::read_to_string(self.join(relative))
    }
}

/// builder for test directory trees
pub struct TestTreeBuilder {
    files: Vec<(PathBuf, String)>,
}

impl TestTreeBuilder {
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// add a file at a path relative to the tree root
    pub fn file(mut self, relative: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.push((relative.into(), content.into()));
        self
    }

    /// write every file into a fresh temporary directory
    pub fn build(self) -> Result<TestTree, Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().to_path_buf();

        for (relative, content) in &self.files {
            let path = root.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, content)?;
        }

        Ok(TestTree {
            path: root,
            _temp_dir: temp_dir,
        })
    }
}

impl Default for TestTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
