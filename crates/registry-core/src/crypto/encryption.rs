//! AES-256-GCM authenticated encryption
//!
//! Serialized format: `{iv_hex}:{auth_tag_hex}:{ciphertext_hex}`
//! - IV: 12 bytes (96 bits) - standard for GCM
//! - Auth tag: 16 bytes (128 bits)
//! - Ciphertext: variable length
//!
//! The serialized value is self-describing: everything needed to decrypt it
//! later, apart from the key, travels with it.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;

use super::RegistryKey;
use crate::error::{RegistryError, Result};

/// Encrypted field value with IV and auth tag
#[derive(Debug, Clone)]
pub struct EncryptedData {
    /// Initialization vector (12 bytes for GCM)
    pub iv: [u8; 12],
    /// Authentication tag (16 bytes)
    pub auth_tag: [u8; 16],
    /// Encrypted ciphertext
    pub ciphertext: Vec<u8>,
}

impl std::fmt::Display for EncryptedData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            hex::encode(self.iv),
            hex::encode(self.auth_tag),
            hex::encode(&self.ciphertext)
        )
    }
}

impl EncryptedData {
    /// Parse from the format: `{iv_hex}:{auth_tag_hex}:{ciphertext_hex}`
    pub fn from_string(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(RegistryError::DecryptionError(
                "Invalid encrypted data format: expected iv:tag:ciphertext".to_string(),
            ));
        }

        let iv_bytes = hex::decode(parts[0])
            .map_err(|e| RegistryError::DecryptionError(format!("Invalid IV hex: {}", e)))?;
        let auth_tag_bytes = hex::decode(parts[1])
            .map_err(|e| RegistryError::DecryptionError(format!("Invalid auth tag hex: {}", e)))?;
        let ciphertext = hex::decode(parts[2])
            .map_err(|e| RegistryError::DecryptionError(format!("Invalid ciphertext hex: {}", e)))?;

        if iv_bytes.len() != 12 {
            return Err(RegistryError::DecryptionError(format!(
                "Invalid IV length: expected 12, got {}",
                iv_bytes.len()
            )));
        }
        if auth_tag_bytes.len() != 16 {
            return Err(RegistryError::DecryptionError(format!(
                "Invalid auth tag length: expected 16, got {}",
                auth_tag_bytes.len()
            )));
        }

        let mut iv = [0u8; 12];
        iv.copy_from_slice(&iv_bytes);

        let mut auth_tag = [0u8; 16];
        auth_tag.copy_from_slice(&auth_tag_bytes);

        Ok(Self {
            iv,
            auth_tag,
            ciphertext,
        })
    }
}

/// Encrypt plaintext using AES-256-GCM
///
/// A key of the wrong length (for instance read back from a truncated key
/// file) fails here, not when the key was loaded.
pub fn encrypt(plaintext: &[u8], key: &RegistryKey) -> Result<EncryptedData> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| RegistryError::EncryptionError(e.to_string()))?;

    // Generate random IV (12 bytes for GCM)
    let mut iv = [0u8; 12];
    rand::thread_rng().fill_bytes(&mut iv);
    let nonce = Nonce::from_slice(&iv);

    // aes-gcm appends the auth tag to the ciphertext
    let ciphertext_with_tag = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| RegistryError::EncryptionError(e.to_string()))?;

    if ciphertext_with_tag.len() < 16 {
        return Err(RegistryError::EncryptionError(
            "Ciphertext too short".to_string(),
        ));
    }

    // Split ciphertext and auth tag (last 16 bytes)
    let tag_start = ciphertext_with_tag.len() - 16;
    let ciphertext = ciphertext_with_tag[..tag_start].to_vec();
    let mut auth_tag = [0u8; 16];
    auth_tag.copy_from_slice(&ciphertext_with_tag[tag_start..]);

    Ok(EncryptedData {
        iv,
        auth_tag,
        ciphertext,
    })
}

/// Encrypt a string and return the serialized format
pub fn encrypt_string(plaintext: &str, key: &RegistryKey) -> Result<String> {
    let encrypted = encrypt(plaintext.as_bytes(), key)?;
    Ok(encrypted.to_string())
}

/// Decrypt ciphertext using AES-256-GCM
///
/// Fails if the key does not match the one used to encrypt, or if the
/// ciphertext or tag has been tampered with.
pub fn decrypt(encrypted: &EncryptedData, key: &RegistryKey) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| RegistryError::DecryptionError(e.to_string()))?;

    let nonce = Nonce::from_slice(&encrypted.iv);

    // Reconstruct ciphertext with tag appended (as expected by aes-gcm)
    let mut ciphertext_with_tag = encrypted.ciphertext.clone();
    ciphertext_with_tag.extend_from_slice(&encrypted.auth_tag);

    cipher
        .decrypt(nonce, ciphertext_with_tag.as_slice())
        .map_err(|e| RegistryError::DecryptionError(e.to_string()))
}

/// Decrypt from serialized format and return as string
pub fn decrypt_string(encrypted_str: &str, key: &RegistryKey) -> Result<String> {
    let encrypted = EncryptedData::from_string(encrypted_str)?;
    let plaintext = decrypt(&encrypted, key)?;
    String::from_utf8(plaintext)
        .map_err(|e| RegistryError::DecryptionError(format!("Invalid UTF-8: {}", e)))
}
