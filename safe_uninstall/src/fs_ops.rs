//! File system operations abstraction for testing
//!
//! The fallback renamer goes through this trait so its collision handling
//! and failure paths can be exercised without touching the real file system.

use std::io;
use std::path::Path;

/// Trait for file system operations to enable testing
pub trait FileSystemOps: Send + Sync {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Rename a directory, without touching its contents
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// Production implementation using std::fs
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystemOps;

impl FileSystemOps for StdFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }
}

pub mod mock {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    /// Mock implementation for testing and for the verification harness.
    ///
    /// Tracks every rename and can simulate rename failures or an arbitrary
    /// set of pre-existing paths.
    #[derive(Clone, Default)]
    pub struct MockFileSystemOps {
        existing_paths: Arc<Mutex<HashSet<String>>>,
        renames: Arc<Mutex<Vec<(String, String)>>>,
        fail_on_rename: Arc<Mutex<Option<String>>>,
    }

    impl MockFileSystemOps {
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a path to the mock file system
        pub fn add_path(&self, path: impl Into<String>) {
            self.existing_paths.lock().unwrap().insert(path.into());
        }

        /// Make renames fail with a specific error message
        pub fn fail_rename_with(&self, error: impl Into<String>) {
            *self.fail_on_rename.lock().unwrap() = Some(error.into());
        }

        /// Get all renames performed so far as (from, to) pairs
        pub fn renames(&self) -> Vec<(String, String)> {
            self.renames.lock().unwrap().clone()
        }
    }

    impl FileSystemOps for MockFileSystemOps {
        fn exists(&self, path: &Path) -> bool {
            self.existing_paths
                .lock()
                .unwrap()
                .contains(path.to_string_lossy().as_ref())
        }

        fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
            if let Some(error) = self.fail_on_rename.lock().unwrap().as_ref() {
                return Err(io::Error::other(error.clone()));
            }
            let from_str = from.to_string_lossy().to_string();
            let to_str = to.to_string_lossy().to_string();
            if !self.existing_paths.lock().unwrap().contains(&from_str) {
                return Err(io::Error::other(format!(
                    "Source path does not exist: {}",
                    from_str
                )));
            }
            self.existing_paths.lock().unwrap().remove(&from_str);
            self.existing_paths.lock().unwrap().insert(to_str.clone());
            self.renames.lock().unwrap().push((from_str, to_str));
            Ok(())
        }
    }
}
