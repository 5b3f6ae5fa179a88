//! # registry-core
//!
//! Core functionality for the Frog Species Registry desktop app including:
//! - AES-256-GCM encryption of species names at rest
//! - Encryption key persistence across launches
//! - SQLite-backed observation record storage

pub mod crypto;
pub mod error;
pub mod keystore;
pub mod record;
pub mod registry;
pub mod store;

pub use crypto::{decrypt_string, encrypt_string, EncryptedData, RegistryKey};
pub use error::{RegistryError, Result};
pub use keystore::load_or_create_key;
pub use record::{ConservationStatus, FrogRecord, NewFrogRecord};
pub use registry::Registry;
pub use store::{RecordStore, DECRYPTION_ERROR_MARKER};
