use std::path::PathBuf;
use std::sync::Arc;

use crate::error::RenameError;
use crate::fs_ops::{FileSystemOps, StdFileSystemOps};
use crate::project_root::ProjectRoot;

/// Suffix inserted between the folder name and the timestamp.
pub const FALLBACK_SUFFIX: &str = ".DELETE_ME_";

/// Collision attempts before giving up rather than looping forever.
const MAX_DISAMBIGUATION: u32 = 50;

/// Non-destructive rename used when the trash facility is unavailable.
///
/// The folder is renamed in place to `<name>.DELETE_ME_<timestamp>`; nothing
/// is ever deleted here, the user removes the renamed folder manually.
pub struct FallbackRenamer<F: FileSystemOps = StdFileSystemOps> {
    fs_ops: Arc<F>,
}

impl FallbackRenamer<StdFileSystemOps> {
    pub fn new() -> Self {
        Self::with_fs_ops(Arc::new(StdFileSystemOps))
    }
}

impl Default for FallbackRenamer<StdFileSystemOps> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSystemOps> FallbackRenamer<F> {
    pub fn with_fs_ops(fs_ops: Arc<F>) -> Self {
        Self { fs_ops }
    }

    /// Renames the project folder to a sibling path that did not exist
    /// before the call.
    ///
    /// The timestamp has second granularity; a numeric disambiguator is
    /// appended when repeated attempts land on the same name.
    pub fn safe_rename(&self, root: &ProjectRoot) -> Result<PathBuf, RenameError> {
        let parent = match root.path().parent() {
            Some(parent) => parent,
            // Validation refuses the filesystem root, so a missing parent
            // means the root was constructed by other means.
            None => {
                return Err(RenameError::IoError(
                    "project root has no parent directory".to_string(),
                ))
            }
        };

        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let base = format!("{}{}{}", root.folder_name(), FALLBACK_SUFFIX, timestamp);

        let mut target = parent.join(&base);
        let mut attempt = 0;
        while self.fs_ops.exists(&target) {
            attempt += 1;
            if attempt > MAX_DISAMBIGUATION {
                return Err(RenameError::TargetConflict(
                    root.path().display().to_string(),
                ));
            }
            target = parent.join(format!("{}_{}", base, attempt));
        }

        tracing::info!(
            "Trash unavailable, renaming {} to {}",
            root.path().display(),
            target.display()
        );
        self.fs_ops
            .rename(root.path(), &target)
            .map_err(|e| RenameError::IoError(e.to_string()))?;
        Ok(target)
    }
}
