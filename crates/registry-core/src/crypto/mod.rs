//! Cryptographic primitives for species name encryption at rest
//!
//! This module provides:
//! - AES-256-GCM authenticated encryption of individual field values
//! - Key material handling with zeroize

mod encryption;
mod key;

pub use encryption::{decrypt, decrypt_string, encrypt, encrypt_string, EncryptedData};
pub use key::{RegistryKey, KEY_LEN};
