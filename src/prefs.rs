//! Remembered display preferences
//!
//! The board remembers two plain strings between runs: the active
//! grouping and the active sorting. They live behind the
//! [`PreferenceStore`] key/value abstraction so the transform never
//! touches storage and tests can run against [`MemoryPreferenceStore`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::board::{Grouping, Sorting};
use crate::error::{Error, Result};
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};

pub const GROUPING_KEY: &str = "grouping";
pub const SORTING_KEY: &str = "sorting";

/// String key/value persistence.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// TOML file of string entries, written atomically under a lock.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        match lock::read_locked_str(&self.path, DEFAULT_LOCK_TIMEOUT_MS)? {
            Some(content) => Ok(toml::from_str(&content)?),
            None => Ok(BTreeMap::new()),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let content = toml::to_string(entries)?;
        lock::write_atomic_locked(&self.path, content.as_bytes(), DEFAULT_LOCK_TIMEOUT_MS)
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        // A corrupt file is replaced rather than blocking every future save.
        let mut entries = self.read_entries().unwrap_or_else(|err| {
            warn!(path = %self.path.display(), error = %err, "discarding unreadable preferences");
            BTreeMap::new()
        });
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)?;
        debug!(key, value, path = %self.path.display(), "preference saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.write_entries(&BTreeMap::new())
    }
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| Error::OperationFailed("preference store poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::OperationFailed("preference store poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::OperationFailed("preference store poisoned".to_string()))?;
        entries.clear();
        Ok(())
    }
}

/// Active grouping and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    pub grouping: Grouping,
    pub sorting: Sorting,
}

impl Preferences {
    /// Read both settings. Never fails.
    ///
    /// Missing, empty or unreadable entries take `defaults`. An unrecognised
    /// grouping also takes the default; an unrecognised sorting orders by
    /// title.
    pub fn load(store: &dyn PreferenceStore, defaults: Preferences) -> Self {
        Self::load_with_warnings(store, defaults).0
    }

    /// [`Preferences::load`], plus a note for every value that was replaced.
    pub fn load_with_warnings(
        store: &dyn PreferenceStore,
        defaults: Preferences,
    ) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();

        let grouping = match read_entry(store, GROUPING_KEY, &mut warnings) {
            Some(raw) if !raw.trim().is_empty() => match raw.parse() {
                Ok(grouping) => grouping,
                Err(_) => {
                    warn!(value = %raw, "unknown stored grouping, using default");
                    warnings.push(format!(
                        "stored grouping '{raw}' is not recognised; using {}",
                        defaults.grouping
                    ));
                    defaults.grouping
                }
            },
            _ => defaults.grouping,
        };
        let sorting = match read_entry(store, SORTING_KEY, &mut warnings) {
            Some(raw) if !raw.trim().is_empty() => match raw.parse() {
                Ok(sorting) => sorting,
                Err(_) => {
                    warn!(value = %raw, "unknown stored sorting, ordering by title");
                    warnings.push(format!(
                        "stored sorting '{raw}' is not recognised; ordering by title"
                    ));
                    Sorting::Title
                }
            },
            _ => defaults.sorting,
        };

        (Self { grouping, sorting }, warnings)
    }

    pub fn save_grouping(store: &dyn PreferenceStore, grouping: Grouping) -> Result<()> {
        store.set(GROUPING_KEY, grouping.as_str())
    }

    pub fn save_sorting(store: &dyn PreferenceStore, sorting: Sorting) -> Result<()> {
        store.set(SORTING_KEY, sorting.as_str())
    }
}

fn read_entry(
    store: &dyn PreferenceStore,
    key: &str,
    warnings: &mut Vec<String>,
) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(err) => {
            warn!(key, error = %err, "failed to read preference");
            let message = format!("preferences could not be read: {err}");
            if !warnings.contains(&message) {
                warnings.push(message);
            }
            None
        }
    }
}
