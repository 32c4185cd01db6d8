use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum_macros::Display;

pub mod events;

/// Identifier parsed from the numeric prefix of an assignment directory.
pub type ScriptId = u32;

/// The OS facility that performed a recoverable deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TrashMechanism {
    #[strum(serialize = "desktop automation")]
    DesktopAutomation,
    #[strum(serialize = "recycle bin API")]
    RecycleBinApi,
    #[strum(serialize = "trash utility")]
    TrashUtility,
}

/// User input events driving the uninstall confirmation state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationInput {
    Proceed,
    TypedText(String),
    Cancel,
}

/// States of the two-step uninstall confirmation gate.
///
/// `Confirmed` and `Cancelled` are terminal. The machine lives only for the
/// duration of a single uninstall attempt and is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmationState {
    #[default]
    Idle,
    AwaitingTypedConfirmation,
    Confirmed,
    Cancelled,
}

impl ConfirmationState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConfirmationState::Confirmed | ConfirmationState::Cancelled
        )
    }
}

/// Why an uninstall attempt stopped before touching the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    ValidationRejected(String),
    UserCancelled,
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbortReason::ValidationRejected(message) => {
                write!(f, "Validation rejected: {}", message)
            }
            AbortReason::UserCancelled => write!(f, "Cancelled by user"),
        }
    }
}

/// Result of one uninstall attempt. Exactly one variant is produced per
/// attempt and none are retried automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    MovedToTrash { mechanism: TrashMechanism },
    RenamedFallback { new_path: PathBuf },
    Aborted { reason: AbortReason },
    Failed { reason: String },
}

/// One runnable script discovered under the assignments directory.
///
/// Descriptors are recomputed on every discovery pass and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptDescriptor {
    pub id: ScriptId,
    pub display_name: String,
    pub path: PathBuf,
}

/// Ordered catalog of discovered scripts, ascending by identifier.
///
/// Duplicate identifiers are not an error: the later-discovered entry
/// silently replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptCatalog {
    scripts: Vec<ScriptDescriptor>,
}

impl ScriptCatalog {
    pub fn from_descriptors(descriptors: Vec<ScriptDescriptor>) -> Self {
        let mut by_id = std::collections::BTreeMap::new();
        for descriptor in descriptors {
            by_id.insert(descriptor.id, descriptor);
        }
        Self {
            scripts: by_id.into_values().collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&ScriptDescriptor> {
        self.scripts.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScriptDescriptor> {
        self.scripts.iter()
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

/// User preferences read from the JSON preferences file in the project root.
///
/// The launcher only ever reads these; the setup flow owns writing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub macos_terminal_preference: String,
    pub linux_terminal_preference: String,
    pub windows_terminal_preference: String,
    pub interpreter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            macos_terminal_preference: "kitty".to_string(),
            linux_terminal_preference: "kitty".to_string(),
            windows_terminal_preference: "wt".to_string(),
            interpreter: "python3".to_string(),
        }
    }
}

impl Settings {
    /// Preferred terminal program for the compile target.
    pub fn preferred_terminal(&self) -> &str {
        if cfg!(target_os = "macos") {
            &self.macos_terminal_preference
        } else if cfg!(target_os = "windows") {
            &self.windows_terminal_preference
        } else {
            &self.linux_terminal_preference
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_orders_by_id() {
        let catalog = ScriptCatalog::from_descriptors(vec![
            ScriptDescriptor {
                id: 3,
                display_name: "Hashing Forensics".to_string(),
                path: PathBuf::from("/a/03_hashing_forensics/03_hashing_forensics.py"),
            },
            ScriptDescriptor {
                id: 1,
                display_name: "String Search".to_string(),
                path: PathBuf::from("/a/01_string_search/01_string_search.py"),
            },
        ]);
        let ids: Vec<_> = catalog.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_catalog_later_duplicate_wins() {
        let catalog = ScriptCatalog::from_descriptors(vec![
            ScriptDescriptor {
                id: 2,
                display_name: "First".to_string(),
                path: PathBuf::from("/a/02_first/a.py"),
            },
            ScriptDescriptor {
                id: 2,
                display_name: "Second".to_string(),
                path: PathBuf::from("/a/02_second/b.py"),
            },
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().display_name, "Second");
    }

    #[test]
    fn test_confirmation_state_terminal() {
        assert!(!ConfirmationState::Idle.is_terminal());
        assert!(!ConfirmationState::AwaitingTypedConfirmation.is_terminal());
        assert!(ConfirmationState::Confirmed.is_terminal());
        assert!(ConfirmationState::Cancelled.is_terminal());
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.linux_terminal_preference, "kitty");
        assert_eq!(settings.windows_terminal_preference, "wt");
        assert_eq!(settings.interpreter, "python3");
    }
}
