use std::path::PathBuf;

use core_types::Settings;

use crate::error::Error;

/// Read-only boundary to the preferences store.
///
/// The store itself (and writing to it) belongs to the setup flow; the
/// launcher only needs the preferred terminal and interpreter. A missing
/// file yields defaults, unknown keys are ignored, and a malformed file is
/// an error the caller may answer with defaults.
#[derive(Debug, Clone)]
pub struct SettingsService {
    preferences_path: PathBuf,
}

impl SettingsService {
    pub fn new(preferences_path: PathBuf) -> Self {
        Self { preferences_path }
    }

    pub fn load(&self) -> Result<Settings, Error> {
        if !self.preferences_path.is_file() {
            tracing::debug!(
                "No preferences file at {}, using defaults",
                self.preferences_path.display()
            );
            return Ok(Settings::default());
        }
        let contents = std::fs::read_to_string(&self.preferences_path)
            .map_err(|e| Error::SettingsError(format!("Failed to read preferences: {}", e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::SettingsError(format!("Failed to parse preferences: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = tempdir().unwrap();
        let service = SettingsService::new(temp_dir.path().join(".showcase_prefs.json"));
        assert_eq!(service.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_known_keys_are_read_and_unknown_ignored() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(".showcase_prefs.json");
        std::fs::write(
            &path,
            r#"{
                "linux_terminal_preference": "alacritty",
                "first_run_notice": {"linux": true}
            }"#,
        )
        .unwrap();

        let settings = SettingsService::new(path).load().unwrap();
        assert_eq!(settings.linux_terminal_preference, "alacritty");
        // Missing keys keep their defaults.
        assert_eq!(settings.windows_terminal_preference, "wt");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(".showcase_prefs.json");
        std::fs::write(&path, "{not json").unwrap();

        let result = SettingsService::new(path).load();
        assert!(matches!(result, Err(Error::SettingsError(_))));
    }
}
