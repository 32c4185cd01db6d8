use std::path::Path;
use std::sync::Arc;

use async_process::Command;
use core_types::TrashMechanism;

use crate::error::TrashError;
use crate::project_root::ProjectRoot;

/// Closed set of per-platform trash strategies.
///
/// Selected once at startup from the compile target, never probed at call
/// time, so a single run always reports the same mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrashStrategy {
    /// Ask the desktop shell (Finder) to move the folder to its trash.
    DesktopAutomation,
    /// Call the native recycle-bin facility directly.
    RecycleBinApi,
    /// Delegate to an external trash utility (`gio trash`).
    TrashUtility,
}

impl TrashStrategy {
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            TrashStrategy::DesktopAutomation
        } else if cfg!(target_os = "windows") {
            TrashStrategy::RecycleBinApi
        } else {
            TrashStrategy::TrashUtility
        }
    }

    pub fn mechanism(&self) -> TrashMechanism {
        match self {
            TrashStrategy::DesktopAutomation => TrashMechanism::DesktopAutomation,
            TrashStrategy::RecycleBinApi => TrashMechanism::RecycleBinApi,
            TrashStrategy::TrashUtility => TrashMechanism::TrashUtility,
        }
    }
}

/// How a trash attempt ended when no unexpected error occurred.
///
/// `Unavailable` means the strategy's prerequisite is absent and is the
/// expected trigger for the rename fallback; unexpected failures come back
/// as [`TrashError`] and must not be papered over with a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrashDisposition {
    Moved(TrashMechanism),
    Unavailable,
}

/// Trait for trash operations.
///
/// Abstracts the platform facility so every disposition can be exercised in
/// tests and in the verification harness on any host.
#[async_trait::async_trait]
pub trait TrashOps: Send + Sync {
    async fn move_to_trash(
        &self,
        path: &Path,
        strategy: TrashStrategy,
    ) -> Result<TrashDisposition, TrashError>;
}

/// Default implementation that drives the real platform facility.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTrashOps;

#[async_trait::async_trait]
impl TrashOps for SystemTrashOps {
    async fn move_to_trash(
        &self,
        path: &Path,
        strategy: TrashStrategy,
    ) -> Result<TrashDisposition, TrashError> {
        match strategy {
            TrashStrategy::DesktopAutomation => finder_trash(path).await,
            TrashStrategy::TrashUtility => gio_trash(path).await,
            TrashStrategy::RecycleBinApi => recycle_bin(path),
        }
    }
}

/// Move a path to Trash via Finder AppleScript (reversible).
async fn finder_trash(path: &Path) -> Result<TrashDisposition, TrashError> {
    if which::which("osascript").is_err() {
        return Ok(TrashDisposition::Unavailable);
    }
    let escaped = path
        .display()
        .to_string()
        .replace('\\', "\\\\")
        .replace('"', "\\\"");
    let script = format!(
        "tell application \"Finder\" to delete POSIX file \"{}\"",
        escaped
    );
    let output = Command::new("osascript")
        .arg("-e")
        .arg(&script)
        .output()
        .await
        .map_err(|e| TrashError::IoError(format!("Failed to run osascript: {}", e)))?;
    if output.status.success() {
        Ok(TrashDisposition::Moved(TrashMechanism::DesktopAutomation))
    } else {
        Err(TrashError::MechanismFailed {
            mechanism: TrashMechanism::DesktopAutomation,
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Move a path to trash via `gio trash` (Freedesktop/GLib).
async fn gio_trash(path: &Path) -> Result<TrashDisposition, TrashError> {
    if which::which("gio").is_err() {
        return Ok(TrashDisposition::Unavailable);
    }
    let output = Command::new("gio")
        .arg("trash")
        .arg(path)
        .output()
        .await
        .map_err(|e| TrashError::IoError(format!("Failed to run gio: {}", e)))?;
    if output.status.success() {
        Ok(TrashDisposition::Moved(TrashMechanism::TrashUtility))
    } else {
        Err(TrashError::MechanismFailed {
            mechanism: TrashMechanism::TrashUtility,
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Move a path to the Recycle Bin with `SHFileOperationW` and
/// `FOF_ALLOWUNDO`.
#[cfg(target_os = "windows")]
fn recycle_bin(path: &Path) -> Result<TrashDisposition, TrashError> {
    use std::os::windows::ffi::OsStrExt;
    use windows_sys::Win32::UI::Shell::{
        SHFileOperationW, FOF_ALLOWUNDO, FOF_NOCONFIRMATION, FO_DELETE, SHFILEOPSTRUCTW,
    };

    // double-NUL-terminated path list
    let mut from: Vec<u16> = path.as_os_str().encode_wide().collect();
    from.push(0);
    from.push(0);

    let mut op = SHFILEOPSTRUCTW {
        hwnd: std::ptr::null_mut(),
        wFunc: FO_DELETE as u32,
        pFrom: from.as_ptr(),
        pTo: std::ptr::null(),
        fFlags: (FOF_ALLOWUNDO | FOF_NOCONFIRMATION) as u16,
        fAnyOperationsAborted: 0,
        hNameMappings: std::ptr::null_mut(),
        lpszProgressTitle: std::ptr::null(),
    };

    let result = unsafe { SHFileOperationW(&mut op) };
    if result == 0 {
        Ok(TrashDisposition::Moved(TrashMechanism::RecycleBinApi))
    } else {
        Err(TrashError::MechanismFailed {
            mechanism: TrashMechanism::RecycleBinApi,
            detail: format!("SHFileOperationW returned {}", result),
        })
    }
}

/// The recycle-bin facility does not exist off Windows; the strategy is only
/// detected there, so reaching this means the mechanism is absent.
#[cfg(not(target_os = "windows"))]
fn recycle_bin(_path: &Path) -> Result<TrashDisposition, TrashError> {
    Ok(TrashDisposition::Unavailable)
}

/// Attempts a recoverable move to the OS trash for a validated project root.
pub struct TrashDispatcher<O: TrashOps = SystemTrashOps> {
    strategy: TrashStrategy,
    ops: Arc<O>,
}

impl TrashDispatcher<SystemTrashOps> {
    pub fn new() -> Self {
        Self::with_ops(TrashStrategy::detect(), Arc::new(SystemTrashOps))
    }
}

impl Default for TrashDispatcher<SystemTrashOps> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: TrashOps> TrashDispatcher<O> {
    pub fn with_ops(strategy: TrashStrategy, ops: Arc<O>) -> Self {
        Self { strategy, ops }
    }

    pub fn strategy(&self) -> TrashStrategy {
        self.strategy
    }

    pub async fn move_to_trash(
        &self,
        root: &ProjectRoot,
    ) -> Result<TrashDisposition, TrashError> {
        tracing::info!(
            "Moving {} to trash via {}",
            root.path().display(),
            self.strategy.mechanism()
        );
        self.ops.move_to_trash(root.path(), self.strategy).await
    }
}

/// Mock implementation for tests and the verification harness.
///
/// Records every call and returns a configured disposition.
#[derive(Clone)]
pub struct MockTrashOps {
    result: MockTrashResult,
    calls: Arc<std::sync::Mutex<Vec<std::path::PathBuf>>>,
}

#[derive(Debug, Clone)]
enum MockTrashResult {
    Moved,
    Unavailable,
    Fail(String),
}

impl MockTrashOps {
    /// Mock that reports a successful move for the selected strategy.
    pub fn new() -> Self {
        Self {
            result: MockTrashResult::Moved,
            calls: Arc::default(),
        }
    }

    /// Mock whose strategy prerequisite is absent.
    pub fn unavailable() -> Self {
        Self {
            result: MockTrashResult::Unavailable,
            calls: Arc::default(),
        }
    }

    /// Mock that fails unexpectedly with the given detail.
    pub fn with_failure(detail: impl Into<String>) -> Self {
        Self {
            result: MockTrashResult::Fail(detail.into()),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<std::path::PathBuf> {
        self.calls.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockTrashOps {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TrashOps for MockTrashOps {
    async fn move_to_trash(
        &self,
        path: &Path,
        strategy: TrashStrategy,
    ) -> Result<TrashDisposition, TrashError> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        match &self.result {
            MockTrashResult::Moved => Ok(TrashDisposition::Moved(strategy.mechanism())),
            MockTrashResult::Unavailable => Ok(TrashDisposition::Unavailable),
            MockTrashResult::Fail(detail) => Err(TrashError::MechanismFailed {
                mechanism: strategy.mechanism(),
                detail: detail.clone(),
            }),
        }
    }
}
