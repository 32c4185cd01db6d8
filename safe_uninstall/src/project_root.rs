use std::path::{Path, PathBuf};

use crate::error::ValidationError;

/// Minimum number of path components a candidate may have. Guards against
/// operating on a drive root or a directly-mounted top-level directory even
/// when someone manages to place marker files there.
pub const MIN_PATH_SEGMENTS: usize = 3;

/// A directory that passed every uninstall safety check.
///
/// Constructed only through [`PathValidator::validate`], fresh for each
/// uninstall attempt. Holding one is the capability to hand the directory to
/// the trash dispatcher or the fallback renamer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRoot {
    path: PathBuf,
    folder_name: String,
}

impl ProjectRoot {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path segment, the text the user must type to confirm.
    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }
}

/// The single gate all destructive operations must pass through.
///
/// Rejections carry the first failed check; no side effects either way.
#[derive(Debug, Clone)]
pub struct PathValidator {
    markers: Vec<String>,
    min_segments: usize,
    home_dir: Option<PathBuf>,
}

impl PathValidator {
    /// Validator with the given marker files and the real home directory.
    pub fn new<S: Into<String>>(markers: impl IntoIterator<Item = S>) -> Self {
        Self::with_home_dir(markers, file_system::get_home_dir())
    }

    /// Validator with an explicit home directory, for tests.
    pub fn with_home_dir<S: Into<String>>(
        markers: impl IntoIterator<Item = S>,
        home_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
            min_segments: MIN_PATH_SEGMENTS,
            home_dir,
        }
    }

    /// Decides whether `candidate` is safe to operate on.
    ///
    /// Rejects when the path does not exist or is not a directory, equals
    /// the filesystem root or the user's home directory, has fewer than the
    /// minimum number of segments, or is missing either marker file as a
    /// direct child. Must be re-invoked at the start of every uninstall
    /// attempt; results are never cached.
    pub fn validate(&self, candidate: &Path) -> Result<ProjectRoot, ValidationError> {
        let path = candidate
            .canonicalize()
            .map_err(|_| ValidationError::Missing(candidate.display().to_string()))?;

        if !path.is_dir() {
            return Err(ValidationError::NotADirectory(path.display().to_string()));
        }

        let folder_name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            // Only the filesystem root has no final component.
            None => return Err(ValidationError::FilesystemRoot),
        };

        if let Some(home) = &self.home_dir {
            let home = home.canonicalize().unwrap_or_else(|_| home.clone());
            if path == home {
                return Err(ValidationError::HomeDirectory);
            }
        }

        let segments = path.components().count();
        if segments < self.min_segments {
            return Err(ValidationError::TooShallow {
                found: segments,
                minimum: self.min_segments,
            });
        }

        for marker in &self.markers {
            if !path.join(marker).is_file() {
                return Err(ValidationError::MarkerMissing(marker.clone()));
            }
        }

        Ok(ProjectRoot { path, folder_name })
    }
}

impl Default for PathValidator {
    fn default() -> Self {
        Self::new(file_system::PROJECT_MARKER_FILES)
    }
}
