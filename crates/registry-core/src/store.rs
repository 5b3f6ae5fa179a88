//! SQLite-backed record storage
//!
//! One table, `frogs`, with the species name column held as AES-256-GCM
//! ciphertext. The remaining columns are plaintext; only the species name
//! is treated as sensitive.

use std::path::Path;

use rusqlite::{params, Connection};
use tracing::{debug, info, warn};

use crate::crypto::{decrypt_string, encrypt_string, RegistryKey};
use crate::error::Result;
use crate::record::{ConservationStatus, FrogRecord, NewFrogRecord};

/// Placeholder shown for a species name that could not be decrypted
pub const DECRYPTION_ERROR_MARKER: &str = "Decryption Error";

/// SQLite-backed store for frog observation records
///
/// Owns the connection and the encryption key for the life of the process.
pub struct RecordStore {
    conn: Connection,
    key: RegistryKey,
}

impl RecordStore {
    /// Open (or create) the database at `db_path` and ensure the schema exists
    pub fn open(db_path: &Path, key: RegistryKey) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let store = Self { conn, key };
        store.create_schema()?;

        debug!("Record store opened at {:?}", db_path);
        Ok(store)
    }

    /// Idempotent schema creation, run on every startup
    fn create_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS frogs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                species_name TEXT NOT NULL,
                genus TEXT NOT NULL,
                habitat TEXT NOT NULL,
                conservation_status TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Insert a new observation and return its assigned id
    ///
    /// Validation and encryption both happen before the database is
    /// touched; a failure in either leaves the table unchanged.
    pub fn insert(&self, record: &NewFrogRecord) -> Result<i64> {
        record.validate()?;

        let encrypted_species = encrypt_string(&record.species_name, &self.key)?;

        self.conn.execute(
            "INSERT INTO frogs (species_name, genus, habitat, conservation_status)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                encrypted_species,
                record.genus,
                record.habitat,
                record.conservation_status,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        info!("Saved frog record {}", id);
        Ok(id)
    }

    /// Return every stored record in insertion order, species names decrypted
    ///
    /// Decryption is attempted independently per row: a row written under a
    /// different key, or with corrupted ciphertext, gets the sentinel marker
    /// instead of aborting the whole listing.
    pub fn list_all(&self) -> Result<Vec<FrogRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, species_name, genus, habitat, conservation_status
             FROM frogs ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, ConservationStatus>(4)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, encrypted_species, genus, habitat, conservation_status) = row?;

            let species_name = match decrypt_string(&encrypted_species, &self.key) {
                Ok(name) => name,
                Err(err) => {
                    warn!("Failed to decrypt species name for record {}: {}", id, err);
                    DECRYPTION_ERROR_MARKER.to_string()
                }
            };

            records.push(FrogRecord {
                id,
                species_name,
                genus,
                habitat,
                conservation_status,
            });
        }

        debug!("Listed {} records", records.len());
        Ok(records)
    }

    /// Number of stored records
    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM frogs", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use tempfile::TempDir;

    fn sample_record() -> NewFrogRecord {
        NewFrogRecord::new(
            "Agalychnis callidryas",
            "Agalychnis",
            "Rainforest canopy",
            ConservationStatus::LeastConcern,
        )
    }

    fn test_store(temp_dir: &TempDir) -> RecordStore {
        let db_path = temp_dir.path().join("frog_registry.db");
        RecordStore::open(&db_path, RegistryKey::generate()).unwrap()
    }

    #[test]
    fn test_insert_list_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let id = store.insert(&sample_record()).unwrap();
        assert_eq!(id, 1);

        let records = store.list_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            FrogRecord {
                id: 1,
                species_name: "Agalychnis callidryas".to_string(),
                genus: "Agalychnis".to_string(),
                habitat: "Rainforest canopy".to_string(),
                conservation_status: ConservationStatus::LeastConcern,
            }
        );
    }

    #[test]
    fn test_species_name_stored_as_ciphertext() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        store.insert(&sample_record()).unwrap();

        let raw: String = store
            .conn
            .query_row("SELECT species_name FROM frogs WHERE id = 1", [], |row| {
                row.get(0)
            })
            .unwrap();

        assert_ne!(raw, "Agalychnis callidryas");
        assert!(!raw.contains("Agalychnis"));
        // Self-describing format: iv:tag:ciphertext
        assert_eq!(raw.split(':').count(), 3);
    }

    #[test]
    fn test_ids_strictly_increasing() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let mut previous = 0;
        for _ in 0..5 {
            let id = store.insert(&sample_record()).unwrap();
            assert!(id > previous);
            previous = id;
        }
    }

    #[test]
    fn test_duplicates_permitted() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        store.insert(&sample_record()).unwrap();
        store.insert(&sample_record()).unwrap();

        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_empty_field_rejected_without_row() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let mut record = sample_record();
        record.habitat = String::new();

        let result = store.insert(&record);
        assert!(matches!(result, Err(RegistryError::Validation(_))));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_schema_creation_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("frog_registry.db");
        let key = RegistryKey::generate();

        let store = RecordStore::open(&db_path, key.clone()).unwrap();
        store.insert(&sample_record()).unwrap();
        drop(store);

        // Re-opening must not disturb existing rows
        let store = RecordStore::open(&db_path, key).unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_key_swap_degrades_to_sentinel() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("frog_registry.db");

        let store = RecordStore::open(&db_path, RegistryKey::generate()).unwrap();
        store.insert(&sample_record()).unwrap();
        drop(store);

        // Same database, different key
        let store = RecordStore::open(&db_path, RegistryKey::generate()).unwrap();
        let records = store.list_all().unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].species_name, DECRYPTION_ERROR_MARKER);
        // Plaintext columns and the id survive intact
        assert_eq!(records[0].id, 1);
        assert_eq!(records[0].genus, "Agalychnis");
        assert_eq!(records[0].habitat, "Rainforest canopy");
        assert_eq!(
            records[0].conservation_status,
            ConservationStatus::LeastConcern
        );
    }

    #[test]
    fn test_bad_row_does_not_block_listing() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("frog_registry.db");
        let key = RegistryKey::generate();

        let store = RecordStore::open(&db_path, key.clone()).unwrap();
        store.insert(&sample_record()).unwrap();

        // Corrupt one row's ciphertext behind the store's back
        store
            .conn
            .execute(
                "UPDATE frogs SET species_name = 'not:a:ciphertext' WHERE id = 1",
                [],
            )
            .unwrap();

        store
            .insert(&NewFrogRecord::new(
                "Litoria caerulea",
                "Litoria",
                "Woodland near water",
                ConservationStatus::NearThreatened,
            ))
            .unwrap();

        let records = store.list_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].species_name, DECRYPTION_ERROR_MARKER);
        assert_eq!(records[1].species_name, "Litoria caerulea");
    }

    #[test]
    fn test_list_order_is_insertion_order() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let species = ["Bufo bufo", "Rana temporaria", "Hyla arborea"];
        for name in species {
            store
                .insert(&NewFrogRecord::new(
                    name,
                    "Genus",
                    "Habitat",
                    ConservationStatus::Vulnerable,
                ))
                .unwrap();
        }

        let records = store.list_all().unwrap();
        let listed: Vec<&str> = records.iter().map(|r| r.species_name.as_str()).collect();
        assert_eq!(listed, species);
    }
}
