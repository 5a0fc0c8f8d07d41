//! Key-value settings store
//!
//! Small string preferences (display name, selected tab, appearance)
//! persisted as `settings.json` next to the item data. Reads absorb
//! missing or malformed content, writes go through the same atomic
//! replace as the item document and failures are logged rather than
//! surfaced.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{error, warn};

use crate::config::Config;
use crate::storage::persistence::atomic_write;

/// Key for the user's display name
pub const NAME_KEY: &str = "name";
/// Key for the selected tab (`welcome`, `home` or `settings`)
pub const TAB_KEY: &str = "tab";
/// Key for the appearance override (empty for system, `light` or `dark`)
pub const APPEARANCE_KEY: &str = "appearance";

/// Display name used when none has been stored
pub const DEFAULT_NAME: &str = "Skipper";
/// Tab selected when none has been stored
pub const DEFAULT_TAB: &str = "welcome";

/// Persistent string key-value settings
pub struct Settings {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl Settings {
    /// Load settings from the configured data directory
    ///
    /// A missing file is the normal first-run state and yields an empty
    /// map; unreadable or malformed content is logged and discarded.
    pub fn open(config: &Config) -> Self {
        let path = config.settings_path();
        let values = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(values) => values,
                Err(err) => {
                    warn!("Invalid settings in {:?}, starting fresh: {}", path, err);
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                warn!("Failed to read settings from {:?}: {}", path, err);
                BTreeMap::new()
            }
        };

        Self { path, values }
    }

    /// Path of the settings document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a stored value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Store a value and persist the settings document
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
        self.persist();
    }

    /// The user's display name, or the default when unset
    pub fn name(&self) -> &str {
        self.get(NAME_KEY).unwrap_or(DEFAULT_NAME)
    }

    /// The selected tab, or the default when unset
    pub fn tab(&self) -> &str {
        self.get(TAB_KEY).unwrap_or(DEFAULT_TAB)
    }

    /// The appearance override; empty means follow the system
    pub fn appearance(&self) -> &str {
        self.get(APPEARANCE_KEY).unwrap_or("")
    }

    /// Iterate over the stored key-value pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check if any values have been stored
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn persist(&self) {
        let data = match serde_json::to_vec_pretty(&self.values) {
            Ok(data) => data,
            Err(err) => {
                error!("Failed to encode settings: {}", err);
                return;
            }
        };

        if let Err(err) = atomic_write(&self.path, &data) {
            error!("Failed to save settings to {:?}: {}", self.path, err);
        }
    }
}
