//! Encryption key persistence across application launches
//!
//! The key lives in a single local file and is read back verbatim on every
//! launch. File contents are not validated; a corrupted or truncated key
//! file only surfaces later, as decryption errors on existing rows.

use std::path::Path;

use tracing::{debug, info};

use crate::crypto::RegistryKey;
use crate::error::Result;

/// Load the encryption key from `path`, generating and persisting a fresh
/// one if no file exists there yet.
///
/// Filesystem errors are fatal to the caller: the registry cannot operate
/// without a stable key.
pub fn load_or_create_key(path: &Path) -> Result<RegistryKey> {
    if path.exists() {
        let bytes = std::fs::read(path)?;
        debug!("Loaded encryption key from {:?}", path);
        return Ok(RegistryKey::from_bytes(bytes));
    }

    let key = RegistryKey::generate();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, key.as_bytes())?;
    info!("Generated new encryption key at {:?}", path);

    Ok(key)
}
