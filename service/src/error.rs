use std::fmt::{Display, Formatter, Result};

use safe_uninstall::error::{RenameError, TrashError};
use script_registry::error::RegistryError;
use terminal_runner::error::TerminalRunnerError;

/// Errors the shell surfaces directly to the user.
///
/// The uninstall flow's expected stops (validation rejection, user
/// cancellation, trash unavailable) are not errors; they travel inside
/// `DeletionOutcome` as `AbortReason` and the rename fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    TrashFailed(String),
    RenameFailed(String),
    SettingsError(String),
    DiscoveryError(String),
    LaunchError(String),
    UninstallInProgress,
    IoError(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Error::TrashFailed(message) => write!(f, "Trash failed: {}", message),
            Error::RenameFailed(message) => write!(
                f,
                "Safe rename failed, the folder was left as-is: {}",
                message
            ),
            Error::SettingsError(message) => write!(f, "Settings error: {}", message),
            Error::DiscoveryError(message) => write!(f, "Discovery error: {}", message),
            Error::LaunchError(message) => write!(f, "Launch error: {}", message),
            Error::UninstallInProgress => {
                write!(f, "An uninstall attempt is already in progress")
            }
            Error::IoError(message) => write!(f, "IO error: {}", message),
        }
    }
}

impl From<TrashError> for Error {
    fn from(err: TrashError) -> Self {
        Error::TrashFailed(err.to_string())
    }
}

impl From<RenameError> for Error {
    fn from(err: RenameError) -> Self {
        Error::RenameFailed(err.to_string())
    }
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        Error::DiscoveryError(err.to_string())
    }
}

impl From<TerminalRunnerError> for Error {
    fn from(err: TerminalRunnerError) -> Self {
        Error::LaunchError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err.to_string())
    }
}
