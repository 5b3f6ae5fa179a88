//! Registry context: data directory, key material, and the open store
//!
//! Replaces ambient global state with one explicit object constructed at
//! startup and threaded through calls.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::info;

use crate::error::{RegistryError, Result};
use crate::keystore::load_or_create_key;
use crate::record::{FrogRecord, NewFrogRecord};
use crate::store::RecordStore;

/// File name of the persisted encryption key
const KEY_FILE: &str = "key.key";

/// File name of the SQLite database
const DB_FILE: &str = "frog_registry.db";

/// Process-wide registry context, constructed once at startup
pub struct Registry {
    store: RecordStore,
    data_dir: PathBuf,
}

impl Registry {
    /// Open the registry in the platform data directory
    ///
    /// Any failure here (key file, directory, schema) is fatal: the
    /// application cannot function without a key and a table.
    pub fn new() -> Result<Self> {
        let data_dir = Self::default_data_dir()?;
        Self::with_dir(&data_dir)
    }

    /// Open the registry against an explicit directory (used by tests)
    pub fn with_dir(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;

        let key = load_or_create_key(&dir.join(KEY_FILE))?;
        let store = RecordStore::open(&dir.join(DB_FILE), key)?;

        info!("Registry opened at {:?}", dir);
        Ok(Self {
            store,
            data_dir: dir.to_path_buf(),
        })
    }

    /// Get the default data directory
    fn default_data_dir() -> Result<PathBuf> {
        ProjectDirs::from("com", "frog-registry", "frog-registry")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                RegistryError::StorageError("Could not determine data directory".to_string())
            })
    }

    /// Persist a new observation and return its assigned id
    pub fn save_record(&self, record: &NewFrogRecord) -> Result<i64> {
        self.store.insert(record)
    }

    /// All stored observations in insertion order
    pub fn list_records(&self) -> Result<Vec<FrogRecord>> {
        self.store.list_all()
    }

    /// Number of stored observations
    pub fn record_count(&self) -> Result<i64> {
        self.store.count()
    }

    /// Directory holding the key file and the database
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ConservationStatus;
    use crate::store::DECRYPTION_ERROR_MARKER;
    use tempfile::TempDir;

    fn sample_record() -> NewFrogRecord {
        NewFrogRecord::new(
            "Agalychnis callidryas",
            "Agalychnis",
            "Rainforest canopy",
            ConservationStatus::LeastConcern,
        )
    }

    #[test]
    fn test_save_and_list() {
        let temp_dir = TempDir::new().unwrap();
        let registry = Registry::with_dir(temp_dir.path()).unwrap();

        let id = registry.save_record(&sample_record()).unwrap();
        assert_eq!(id, 1);

        let records = registry.list_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].species_name, "Agalychnis callidryas");
        assert_eq!(records[0].genus, "Agalychnis");
        assert_eq!(records[0].habitat, "Rainforest canopy");
        assert_eq!(
            records[0].conservation_status,
            ConservationStatus::LeastConcern
        );
    }

    #[test]
    fn test_records_survive_restart() {
        let temp_dir = TempDir::new().unwrap();

        {
            let registry = Registry::with_dir(temp_dir.path()).unwrap();
            registry.save_record(&sample_record()).unwrap();
        }

        // A new process run loads the same key and decrypts existing rows
        {
            let registry = Registry::with_dir(temp_dir.path()).unwrap();
            let records = registry.list_records().unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].species_name, "Agalychnis callidryas");
        }
    }

    #[test]
    fn test_swapped_key_file_yields_sentinel() {
        let temp_dir = TempDir::new().unwrap();

        {
            let registry = Registry::with_dir(temp_dir.path()).unwrap();
            registry.save_record(&sample_record()).unwrap();
        }

        // Replace the key file between runs
        std::fs::remove_file(temp_dir.path().join("key.key")).unwrap();

        {
            let registry = Registry::with_dir(temp_dir.path()).unwrap();
            let records = registry.list_records().unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].species_name, DECRYPTION_ERROR_MARKER);
            assert_eq!(records[0].id, 1);
            assert_eq!(records[0].genus, "Agalychnis");
        }
    }

    #[test]
    fn test_record_count_tracks_inserts() {
        let temp_dir = TempDir::new().unwrap();
        let registry = Registry::with_dir(temp_dir.path()).unwrap();

        assert_eq!(registry.record_count().unwrap(), 0);
        registry.save_record(&sample_record()).unwrap();
        registry.save_record(&sample_record()).unwrap();
        assert_eq!(registry.record_count().unwrap(), 2);
    }

    #[test]
    fn test_data_dir_exposed() {
        let temp_dir = TempDir::new().unwrap();
        let registry = Registry::with_dir(temp_dir.path()).unwrap();
        assert_eq!(registry.data_dir(), temp_dir.path());
    }
}
