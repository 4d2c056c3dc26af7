//! Persisted user preferences.
//!
//! Stored as JSON under the platform config directory. The core consumes a
//! single value from here: the poll interval. Unknown keys in the file are
//! ignored on load and never written back.
//!
//! SECURITY MODEL:
//! - Display preferences only. No credentials, tokens, or API keys.
//! - File permissions are restricted to the owning user on creation
//!   (best effort, Unix only).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::StoreError;

/// Default seconds between polls.
pub const DEFAULT_POLL_INTERVAL: u64 = 30;

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL
}

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Seconds between API polls. Always positive.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl Settings {
    /// Returns the default settings file path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoConfigDir`] if the platform config directory
    /// cannot be determined.
    pub fn default_path() -> Result<PathBuf, StoreError> {
        dirs::config_dir()
            .map(|d| d.join("pinch").join("settings.json"))
            .ok_or(StoreError::NoConfigDir)
    }

    /// Loads settings from the default path, falling back to defaults.
    pub fn load() -> Self {
        match Self::default_path() {
            Ok(path) => Self::load_from(&path),
            Err(_) => Self::default(),
        }
    }

    /// Loads settings from a specific path, falling back to defaults for a
    /// missing or malformed file.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Settings>(&content) {
                Ok(settings) => settings.sanitized(),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse settings");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read settings");
                Self::default()
            }
        }
    }

    /// Saves settings to the default path.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the config directory is unavailable or
    /// the file cannot be written.
    pub fn save(&self) -> Result<(), StoreError> {
        self.save_to(&Self::default_path()?)
    }

    /// Saves settings to a specific path with restricted permissions.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.clone().sanitized())?;
        fs::write(path, content)?;
        restrict_permissions(path);

        info!(path = %path.display(), "Settings saved");
        Ok(())
    }

    /// Replaces a non-positive interval with the default.
    pub fn sanitized(mut self) -> Self {
        if self.poll_interval == 0 {
            self.poll_interval = DEFAULT_POLL_INTERVAL;
        }
        self
    }
}

/// Restricts the file to owner-only read/write. Best effort.
#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        debug!(error = %e, "Could not restrict settings permissions");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.poll_interval, 30);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("nope.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = Settings { poll_interval: 120 };
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"poll_interval": 45, "theme": "dark", "autostart": true}"#).unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.poll_interval, 45);
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{broken").unwrap();

        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_zero_interval_sanitized() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"poll_interval": 0}"#).unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.poll_interval, DEFAULT_POLL_INTERVAL);
    }

    #[cfg(unix)]
    #[test]
    fn test_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        Settings::default().save_to(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
