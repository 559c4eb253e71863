// src/core/crypto/mod.rs
//! Pure cryptographic operations: no registry, no instance state
//!
//! All functions work on in-memory buffers. The envelope is
//! `pad4(len(iv)) || iv || ciphertext`, optionally wrapped in an outer
//! text encoding by [`encoding`].
mod decrypt;
mod encrypt;
pub mod encoding;
pub mod envelope;

pub use decrypt::{decrypt_envelope, decrypt_to_vec};
pub use encrypt::{encrypt_envelope, encrypt_to_vec, generate_iv};
pub use encoding::{decode_outer, encode_outer};
pub use envelope::{frame, Envelope};

use crate::aliases::CipherKey32;
use crate::consts::CIPHER_KEY_LEN;
use crate::error::{CoreError, Result};

/// Build the 256-bit cipher key from resolved key bytes.
///
/// Keys longer than 32 bytes are truncated to their first 32 bytes, the
/// way OpenSSL treated over-long keys when the envelope format was defined.
/// Shorter keys are rejected.
pub fn cipher_key(key: &[u8]) -> Result<CipherKey32> {
    let bytes: [u8; CIPHER_KEY_LEN] = key
        .get(..CIPHER_KEY_LEN)
        .and_then(|head| head.try_into().ok())
        .ok_or(CoreError::InvalidKeyLength {
            expected: CIPHER_KEY_LEN,
            actual: key.len(),
        })?;
    Ok(CipherKey32::new(bytes))
}
