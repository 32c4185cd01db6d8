use std::path::Path;

use async_process::{Child, Command};
use core_types::{ScriptDescriptor, Settings};

use error::TerminalRunnerError;

pub mod error;
pub mod ops;

/// Handle to a spawned terminal process.
///
/// The child's lifetime is independent of the launcher; the handle only
/// exists so a watcher task can report the eventual exit back to the event
/// loop. Mock handles carry no child and resolve immediately.
pub struct ProcessHandle {
    child: Option<Child>,
}

impl ProcessHandle {
    fn from_child(child: Child) -> Self {
        Self { child: Some(child) }
    }

    /// Handle without an underlying process, used by mock runners.
    pub fn detached() -> Self {
        Self { child: None }
    }

    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(|child| child.id())
    }

    /// Waits for the terminal process to exit and reports whether it
    /// succeeded.
    pub async fn wait(self) -> Result<bool, TerminalRunnerError> {
        match self.child {
            Some(mut child) => {
                let status = child
                    .status()
                    .await
                    .map_err(|e| TerminalRunnerError::IoError(e.to_string()))?;
                Ok(status.success())
            }
            None => Ok(true),
        }
    }
}

/// Spawns the script in the resolved terminal program and returns without
/// waiting for completion.
///
/// The preferred terminal from settings is tried first, then a fixed
/// per-platform candidate list. Failure to locate any terminal is reported,
/// never swallowed.
///
/// # errors
/// * `TerminalRunnerError::ScriptNotFound`: the descriptor's file vanished
///   since discovery.
/// * `TerminalRunnerError::NoTerminalAvailable`: no candidate terminal is on
///   the PATH.
/// * `TerminalRunnerError::IoError`: spawning the terminal failed.
pub async fn run_in_terminal(
    descriptor: &ScriptDescriptor,
    project_root: &Path,
    settings: &Settings,
) -> Result<ProcessHandle, TerminalRunnerError> {
    if !descriptor.path.is_file() {
        return Err(TerminalRunnerError::ScriptNotFound(
            descriptor.path.display().to_string(),
        ));
    }

    let shell_command = script_command(descriptor, project_root, settings);
    let terminal = resolve_terminal(settings.preferred_terminal())?;
    let args = terminal_invocation(&terminal, &shell_command);

    tracing::info!(
        "Launching {} in {} (pid pending)",
        descriptor.display_name,
        terminal
    );
    tracing::debug!("Terminal invocation: {} {:?}", terminal, args);

    let child = Command::new(&terminal)
        .args(&args)
        .spawn()
        .map_err(|e| TerminalRunnerError::IoError(format!("Failed to spawn {}: {}", terminal, e)))?;
    Ok(ProcessHandle::from_child(child))
}

/// Candidate terminal programs for the compile target, most capable first.
fn platform_candidates() -> &'static [&'static str] {
    if cfg!(target_os = "macos") {
        &["kitty", "alacritty", "wezterm"]
    } else if cfg!(target_os = "windows") {
        &["wt", "powershell"]
    } else {
        &[
            "kitty",
            "alacritty",
            "wezterm",
            "gnome-terminal",
            "konsole",
            "xterm",
            "x-terminal-emulator",
        ]
    }
}

/// First terminal program from preferred + platform candidates that resolves
/// on the PATH.
fn resolve_terminal(preferred: &str) -> Result<String, TerminalRunnerError> {
    let mut candidates: Vec<&str> = vec![preferred];
    for candidate in platform_candidates() {
        if *candidate != preferred {
            candidates.push(candidate);
        }
    }
    candidates
        .into_iter()
        .find(|candidate| which::which(candidate).is_ok())
        .map(str::to_string)
        .ok_or(TerminalRunnerError::NoTerminalAvailable)
}

/// Shell command run inside the terminal: change to the project root, run
/// the interpreter on the script, keep the window open until Enter.
fn script_command(descriptor: &ScriptDescriptor, project_root: &Path, settings: &Settings) -> String {
    if cfg!(target_os = "windows") {
        format!(
            "Set-Location '{}'; & '{}' '{}'; Read-Host 'Finished. Press Enter to close'",
            project_root.display(),
            settings.interpreter,
            descriptor.path.display()
        )
    } else {
        format!(
            "cd {}; {} {}; echo; read -p 'Finished. Press Enter to close.'",
            shell_quote(&project_root.display().to_string()),
            shell_quote(&settings.interpreter),
            shell_quote(&descriptor.path.display().to_string())
        )
    }
}

/// Argument list for a known terminal program wrapping the shell command.
fn terminal_invocation(terminal: &str, shell_command: &str) -> Vec<String> {
    let name = Path::new(terminal)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| terminal.to_string());
    let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    match name.as_str() {
        "kitty" => owned(&["--hold", "bash", "-lc", shell_command]),
        "alacritty" => owned(&["-e", "bash", "-lc", shell_command]),
        "wezterm" => owned(&["start", "--", "bash", "-lc", shell_command]),
        "gnome-terminal" => owned(&["--window", "--", "bash", "-lc", shell_command]),
        "konsole" => owned(&["--new-window", "-e", "bash", "-lc", shell_command]),
        "wt" => owned(&["powershell", "-NoExit", "-Command", shell_command]),
        "powershell" => owned(&["-NoExit", "-Command", shell_command]),
        // xterm, x-terminal-emulator and anything unrecognized take -e.
        _ => owned(&["-e", "bash", "-lc", shell_command]),
    }
}

/// Single-quote `value` for POSIX shells.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}
