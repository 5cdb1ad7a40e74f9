//! Remembered form settings.
//!
//! Persisted as one JSON document under [`SETTINGS_KEY`], only while the
//! user has opted in. Storage problems are logged and otherwise ignored:
//! losing the saved form must never get in the way of a calculation.

use crate::capacity::{AbsenceRecord, SprintConfig};
use crate::config::{
    DEFAULT_BUILD_PCT, DEFAULT_DEV_COUNT, DEFAULT_SPRINT_DAYS, DEFAULT_VELOCITY, SETTINGS_KEY,
};
use crate::storage::{KeyValueStore, StorageError};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedAbsence {
    pub dev_index: u32,
    pub value: f64,
}

/// Values the defaults button writes into the team fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDefaults {
    pub default_velocity: f64,
    pub default_dev_count: u32,
    pub default_sprint_days: f64,
    pub default_build_percent: f64,
}

impl Default for SavedDefaults {
    fn default() -> Self {
        Self {
            default_velocity: DEFAULT_VELOCITY,
            default_dev_count: DEFAULT_DEV_COUNT,
            default_sprint_days: DEFAULT_SPRINT_DAYS,
            default_build_percent: DEFAULT_BUILD_PCT,
        }
    }
}

/// Snapshot of the form as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSettings {
    pub velocity: f64,
    pub dev_count: u32,
    pub sprint_days: f64,
    pub build_percent: f64,
    pub remember_settings: bool,
    #[serde(default)]
    pub absences: Vec<SavedAbsence>,
    /// Older snapshots have no defaults; they get the built-in ones.
    #[serde(default)]
    pub defaults: SavedDefaults,
}

impl PersistedSettings {
    /// Opted-in snapshot of a config and its absences.
    pub fn new(config: &SprintConfig, absences: &[AbsenceRecord]) -> Self {
        Self {
            velocity: config.velocity,
            dev_count: config.developer_count,
            sprint_days: config.sprint_days,
            build_percent: config.build_percent,
            remember_settings: true,
            absences: absences
                .iter()
                .map(|a| SavedAbsence {
                    dev_index: a.developer_index,
                    value: a.days_absent,
                })
                .collect(),
            defaults: SavedDefaults::default(),
        }
    }

    pub fn absence_records(&self) -> Vec<AbsenceRecord> {
        self.absences
            .iter()
            .map(|a| AbsenceRecord {
                developer_index: a.dev_index,
                days_absent: a.value,
            })
            .collect()
    }
}

#[derive(Debug)]
pub enum PersistenceError {
    Storage(StorageError),
    Serialize(serde_json::Error),
    Deserialize(serde_json::Error),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Storage(e) => write!(f, "{}", e),
            PersistenceError::Serialize(e) => write!(f, "Failed to serialize settings: {}", e),
            PersistenceError::Deserialize(e) => write!(f, "Malformed saved settings: {}", e),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<StorageError> for PersistenceError {
    fn from(e: StorageError) -> Self {
        PersistenceError::Storage(e)
    }
}

/// Sole reader and writer of the settings key.
#[derive(Debug)]
pub struct SettingsStore<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Write the snapshot if it is opted in. Failures are logged only.
    pub fn save(&self, settings: &PersistedSettings) {
        if !settings.remember_settings {
            debug!("Settings not remembered, skipping save");
            return;
        }
        match self.try_save(settings) {
            Ok(()) => debug!("Settings saved"),
            Err(e) => warn!("Could not save settings: {}", e),
        }
    }

    /// Last opted-in snapshot, if any can be read.
    pub fn load(&self) -> Option<PersistedSettings> {
        match self.try_load() {
            Ok(Some(settings)) if settings.remember_settings => {
                info!("Loaded settings from storage");
                Some(settings)
            }
            Ok(_) => None,
            Err(e) => {
                warn!("Could not load settings: {}", e);
                None
            }
        }
    }

    pub fn clear(&self) {
        match self.backend.remove(SETTINGS_KEY) {
            Ok(()) => info!("Saved settings cleared"),
            Err(e) => warn!("Could not clear settings: {}", e),
        }
    }

    fn try_save(&self, settings: &PersistedSettings) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(settings).map_err(PersistenceError::Serialize)?;
        self.backend.set(SETTINGS_KEY, &json)?;
        Ok(())
    }

    fn try_load(&self) -> Result<Option<PersistedSettings>, PersistenceError> {
        let Some(json) = self.backend.get(SETTINGS_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(PersistenceError::Deserialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::rc::Rc;

    /// Backend whose every call fails, like a full or disabled localStorage.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Rejected("SecurityError".to_string()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Rejected("QuotaExceededError".to_string()))
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    fn sample() -> PersistedSettings {
        let config = SprintConfig {
            velocity: 22.0,
            developer_count: 3,
            sprint_days: 10.0,
            build_percent: 80.0,
        };
        let absences = [
            AbsenceRecord {
                developer_index: 1,
                days_absent: 2.0,
            },
            AbsenceRecord {
                developer_index: 3,
                days_absent: 5.5,
            },
        ];
        PersistedSettings::new(&config, &absences)
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let store = SettingsStore::new(MemoryStore::new());
        store.save(&sample());
        assert_eq!(store.load(), Some(sample()));
        assert_eq!(store.load().unwrap().absence_records()[1].days_absent, 5.5);
    }

    #[test]
    fn test_json_shape() {
        let backend = Rc::new(MemoryStore::new());
        let store = SettingsStore::new(backend.clone());
        store.save(&sample());

        let raw = backend.get(SETTINGS_KEY).unwrap().unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["devCount"], 3);
        assert_eq!(doc["sprintDays"], 10.0);
        assert_eq!(doc["buildPercent"], 80.0);
        assert_eq!(doc["rememberSettings"], true);
        assert_eq!(doc["absences"][1]["devIndex"], 3);
        assert_eq!(doc["absences"][1]["value"], 5.5);
        assert_eq!(doc["defaults"]["defaultVelocity"], 22.0);
        assert_eq!(doc["defaults"]["defaultDevCount"], 3);
    }

    #[test]
    fn test_custom_defaults_roundtrip() {
        let store = SettingsStore::new(MemoryStore::new());
        let mut settings = sample();
        settings.defaults = SavedDefaults {
            default_velocity: 30.0,
            default_dev_count: 5,
            default_sprint_days: 15.0,
            default_build_percent: 70.0,
        };
        store.save(&settings);
        assert_eq!(store.load().unwrap().defaults, settings.defaults);
    }

    #[test]
    fn test_opted_out_snapshot_is_not_written() {
        let store = SettingsStore::new(MemoryStore::new());
        let mut settings = sample();
        settings.remember_settings = false;
        store.save(&settings);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_empty_storage_loads_none() {
        let store = SettingsStore::new(MemoryStore::new());
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_malformed_json_loads_none() {
        let backend = Rc::new(MemoryStore::new());
        backend.set(SETTINGS_KEY, "{ not json").unwrap();
        let store = SettingsStore::new(backend);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_stored_opt_out_loads_none() {
        let backend = Rc::new(MemoryStore::new());
        backend
            .set(
                SETTINGS_KEY,
                r#"{"velocity":22,"devCount":3,"sprintDays":10,"buildPercent":80,"rememberSettings":false,"absences":[]}"#,
            )
            .unwrap();
        assert_eq!(SettingsStore::new(backend).load(), None);
    }

    #[test]
    fn test_missing_absences_field_defaults_to_empty() {
        let backend = Rc::new(MemoryStore::new());
        backend
            .set(
                SETTINGS_KEY,
                r#"{"velocity":22,"devCount":3,"sprintDays":10,"buildPercent":80,"rememberSettings":true}"#,
            )
            .unwrap();
        let loaded = SettingsStore::new(backend).load().unwrap();
        assert!(loaded.absences.is_empty());
        assert_eq!(loaded.defaults, SavedDefaults::default());
    }

    #[test]
    fn test_clear_removes_snapshot() {
        let store = SettingsStore::new(MemoryStore::new());
        store.save(&sample());
        store.clear();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_broken_backend_is_swallowed() {
        let store = SettingsStore::new(BrokenStore);
        store.save(&sample());
        assert_eq!(store.load(), None);
        store.clear();
    }

    #[test]
    fn test_persistence_error_display() {
        let err = PersistenceError::from(StorageError::Unavailable);
        assert_eq!(err.to_string(), "Storage is not available");
    }
}
