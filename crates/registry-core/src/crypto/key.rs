//! Encryption key material with automatic zeroization

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length in bytes of a freshly generated key (AES-256)
pub const KEY_LEN: usize = 32;

/// Registry encryption key - automatically zeroed when dropped
///
/// Holds whatever bytes the key file contained. The length is deliberately
/// not checked here; a key of the wrong size fails when the cipher is
/// constructed, which for pre-existing rows shows up as a decryption error.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct RegistryKey {
    key: Vec<u8>,
}

impl RegistryKey {
    /// Generate a fresh 256-bit key from the OS CSPRNG
    pub fn generate() -> Self {
        let mut key = vec![0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        Self { key }
    }

    /// Wrap raw key bytes read back from disk
    pub fn from_bytes(key: Vec<u8>) -> Self {
        Self { key }
    }

    /// Get the key bytes (use carefully - avoid copying)
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }
}

impl Clone for RegistryKey {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
        }
    }
}

impl std::fmt::Debug for RegistryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}
