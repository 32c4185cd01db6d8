use core_types::TrashMechanism;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("path does not exist: {0}")]
    Missing(String),
    #[error("path is not a directory: {0}")]
    NotADirectory(String),
    #[error("refusing to operate on the filesystem root")]
    FilesystemRoot,
    #[error("refusing to operate on the home directory")]
    HomeDirectory,
    #[error("path has too few segments ({found}, minimum {minimum})")]
    TooShallow { found: usize, minimum: usize },
    #[error("marker file missing: {0}")]
    MarkerMissing(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrashError {
    #[error("{mechanism} failed: {detail}")]
    MechanismFailed {
        mechanism: TrashMechanism,
        detail: String,
    },
    #[error("IO error: {0}")]
    IoError(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenameError {
    #[error("could not find a free fallback name next to {0}")]
    TargetConflict(String),
    #[error("IO error: {0}")]
    IoError(String),
}
