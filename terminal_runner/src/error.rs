use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerminalRunnerError {
    #[error("no supported terminal emulator found")]
    NoTerminalAvailable,
    #[error("script not found: {0}")]
    ScriptNotFound(String),
    #[error("IO error: {0}")]
    IoError(String),
}
