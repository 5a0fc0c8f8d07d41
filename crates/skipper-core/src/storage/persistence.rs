//! JSON persistence for the item collection
//!
//! Items are stored as a single JSON document (`appdata.json`) that is
//! rewritten in full on every save. Writes go through a temp-file rename
//! so a crash mid-write never leaves a truncated document behind.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::config::Config;
use crate::models::Item;

use super::error::{StorageError, StorageResult};

/// Number of generated fallback items when no saved data can be loaded
pub const DEFAULT_ITEM_COUNT: i64 = 365;

/// Handles reading and writing the item document
pub struct ItemPersistence {
    path: PathBuf,
}

impl ItemPersistence {
    /// Create a persistence handle for the configured data directory
    pub fn new(config: &Config) -> Self {
        Self {
            path: config.items_path(),
        }
    }

    /// Path of the item document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a saved document exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the saved items, reporting any failure to the caller
    pub fn try_load(&self) -> StorageResult<Vec<Item>> {
        Ok(self.read_document()?.1)
    }

    /// Load the saved items, falling back to generated defaults
    ///
    /// A missing or unreadable document is not an error at this level:
    /// the failure is logged and a deterministic year of placeholder
    /// items (dated relative to `now`) is returned instead.
    pub fn load_or_default(&self, now: DateTime<Utc>) -> Vec<Item> {
        let start = Instant::now();
        match self.read_document() {
            Ok((bytes, items)) => {
                info!(
                    "Loaded {} bytes from {:?} in {:.2?}",
                    bytes,
                    self.path,
                    start.elapsed()
                );
                items
            }
            Err(err) => {
                warn!(
                    "Failed to load items from {:?}, using default items: {}",
                    self.path, err
                );
                default_items(now)
            }
        }
    }

    fn read_document(&self) -> StorageResult<(usize, Vec<Item>)> {
        if !self.path.exists() {
            return Err(StorageError::NotFound {
                path: self.path.clone(),
            });
        }

        let bytes = fs::read(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied {
                path: self.path.clone(),
                source: e,
            },
            io::ErrorKind::NotFound => StorageError::NotFound {
                path: self.path.clone(),
            },
            _ => StorageError::ReadError {
                path: self.path.clone(),
                source: e,
            },
        })?;

        let items = serde_json::from_slice(&bytes).map_err(|e| StorageError::InvalidFormat {
            path: self.path.clone(),
            source: e,
        })?;

        Ok((bytes.len(), items))
    }

    /// Write the full item collection, replacing any previous document
    pub fn save(&self, items: &[Item]) -> StorageResult<()> {
        let start = Instant::now();
        let data = serde_json::to_vec(items)?;
        atomic_write(&self.path, &data)?;
        info!(
            "Saved {} bytes to {:?} in {:.2?}",
            data.len(),
            self.path,
            start.elapsed()
        );
        Ok(())
    }
}

/// Generate the fallback item collection
///
/// One untitled item per day for the past year, newest first. Dates are
/// derived from `now`, so two calls with the same timestamp produce the
/// same dates (ids are still freshly generated).
pub fn default_items(now: DateTime<Utc>) -> Vec<Item> {
    (1..=DEFAULT_ITEM_COUNT)
        .map(|days_ago| Item::with_date(now - Duration::days(days_ago)))
        .collect()
}

/// Write data to a file atomically using a temp file and rename
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let tmp_path = path.with_extension("tmp");
    {
        let mut file = fs::File::create(&tmp_path)
            .map_err(|e| StorageError::from_io(e, tmp_path.clone()))?;
        file.write_all(data)
            .map_err(|e| StorageError::from_io(e, tmp_path.clone()))?;
        file.sync_all()
            .map_err(|e| StorageError::from_io(e, tmp_path.clone()))?;
    }

    fs::rename(&tmp_path, path).map_err(|e| StorageError::AtomicWriteFailed {
        from: tmp_path.clone(),
        to: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Sizes and presence of the on-disk documents
#[derive(Debug, Clone)]
pub struct StorageStats {
    pub items_exists: bool,
    pub settings_exists: bool,
    pub items_size: u64,
    pub settings_size: u64,
}

impl StorageStats {
    /// Collect stats for the configured data directory
    pub fn gather(config: &Config) -> Self {
        let (items_exists, items_size) = file_stat(&config.items_path());
        let (settings_exists, settings_size) = file_stat(&config.settings_path());
        Self {
            items_exists,
            settings_exists,
            items_size,
            settings_size,
        }
    }

    /// Total bytes across all documents
    pub fn total_size(&self) -> u64 {
        self.items_size + self.settings_size
    }

    /// Total size formatted for display
    pub fn total_size_human(&self) -> String {
        format_size(self.total_size())
    }
}

fn file_stat(path: &Path) -> (bool, u64) {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => (true, meta.len()),
        _ => (false, 0),
    }
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
