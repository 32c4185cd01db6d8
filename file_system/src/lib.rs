use std::{
    env, fs,
    path::{Path, PathBuf},
};

use directories_next::{BaseDirs, ProjectDirs};

/// Marker files expected as direct children of the project root.
///
/// These names are a contract with the repository layout; the uninstall
/// safety checks refuse to operate on any directory missing them.
pub const PROJECT_MARKER_FILES: [&str; 2] = ["Cargo.toml", "README.md"];

/// Name of the JSON preferences file in the project root.
pub const PREFERENCES_FILE_NAME: &str = ".showcase_prefs.json";

/// Directory under the project root holding one subdirectory per assignment.
pub const ASSIGNMENTS_DIR_NAME: &str = "assignments";

/// Resolves the launcher's own installation directory.
///
/// Prefers the working directory when it carries the project markers,
/// otherwise walks up from the executable location. Falls back to the
/// working directory so that validation produces the actual rejection
/// message instead of a panic here.
pub fn get_project_root() -> PathBuf {
    if let Ok(cwd) = env::current_dir() {
        if has_project_markers(&cwd) {
            return cwd;
        }
    }
    if let Ok(exe) = env::current_exe() {
        for ancestor in exe.ancestors().skip(1) {
            if has_project_markers(ancestor) {
                return ancestor.to_path_buf();
            }
        }
    }
    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// True when every project marker exists as a direct child of `dir`.
pub fn has_project_markers(dir: &Path) -> bool {
    PROJECT_MARKER_FILES
        .iter()
        .all(|marker| dir.join(marker).is_file())
}

/// Returns path to the preferences file for the given project root.
pub fn get_preferences_path(project_root: &Path) -> PathBuf {
    project_root.join(PREFERENCES_FILE_NAME)
}

/// Returns path to the assignments directory for the given project root.
pub fn get_assignments_dir(project_root: &Path) -> PathBuf {
    project_root.join(ASSIGNMENTS_DIR_NAME)
}

/// Returns the user's home directory, when one can be determined.
pub fn get_home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Returns the log directory in the default data dir for the application.
pub fn get_log_dir() -> PathBuf {
    let project_dirs =
        ProjectDirs::from("org", "showcase", "showcase").expect("could not determine project directory");
    let log_dir = project_dirs.data_local_dir().join("logs");
    fs::create_dir_all(&log_dir).expect("Failed to create log directory");
    log_dir
}
