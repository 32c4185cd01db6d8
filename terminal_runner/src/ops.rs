use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use core_types::{ScriptDescriptor, Settings};

use crate::error::TerminalRunnerError;
use crate::{run_in_terminal, ProcessHandle};

/// Trait for terminal launch operations.
///
/// Abstracts the launch so the shell controller can be tested without
/// opening terminal windows.
#[async_trait::async_trait]
pub trait TerminalRunnerOps: Send + Sync {
    /// Spawns the script detached in a terminal and returns its handle.
    async fn run_script(
        &self,
        descriptor: &ScriptDescriptor,
        project_root: &Path,
        settings: &Settings,
    ) -> Result<ProcessHandle, TerminalRunnerError>;
}

/// Default implementation that performs the actual launch.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTerminalRunnerOps;

impl DefaultTerminalRunnerOps {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl TerminalRunnerOps for DefaultTerminalRunnerOps {
    async fn run_script(
        &self,
        descriptor: &ScriptDescriptor,
        project_root: &Path,
        settings: &Settings,
    ) -> Result<ProcessHandle, TerminalRunnerError> {
        run_in_terminal(descriptor, project_root, settings).await
    }
}

/// Represents a recorded call to the mock runner.
#[derive(Debug, Clone)]
pub struct LaunchCall {
    pub script_path: PathBuf,
    pub preferred_terminal: String,
}

/// Mock implementation for testing launch behavior.
#[derive(Clone, Default)]
pub struct MockTerminalRunnerOps {
    should_fail: bool,
    error_message: Option<String>,
    launch_calls: Arc<Mutex<Vec<LaunchCall>>>,
}

impl MockTerminalRunnerOps {
    /// Mock that succeeds on every launch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock that fails every launch with the given error message.
    pub fn with_failure(error_msg: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(error_msg.into()),
            ..Default::default()
        }
    }

    pub fn launch_calls(&self) -> Vec<LaunchCall> {
        self.launch_calls.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.launch_calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl TerminalRunnerOps for MockTerminalRunnerOps {
    async fn run_script(
        &self,
        descriptor: &ScriptDescriptor,
        _project_root: &Path,
        settings: &Settings,
    ) -> Result<ProcessHandle, TerminalRunnerError> {
        self.launch_calls.lock().unwrap().push(LaunchCall {
            script_path: descriptor.path.clone(),
            preferred_terminal: settings.preferred_terminal().to_string(),
        });
        if self.should_fail {
            return Err(TerminalRunnerError::IoError(
                self.error_message
                    .clone()
                    .unwrap_or_else(|| "Mock launch failed".to_string()),
            ));
        }
        Ok(ProcessHandle::detached())
    }
}
