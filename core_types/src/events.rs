use crate::ScriptId;

/// Lifecycle of one detached script launch, reported back to the event loop
/// by a watcher task.
#[derive(Debug, Clone)]
pub enum LaunchEvent {
    Started { id: ScriptId },
    Exited { id: ScriptId, success: bool },
    Failed { id: ScriptId, error: String },
}
