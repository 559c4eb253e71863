//! Small utility functions used across the core module
//!
//! Hashing helpers for change detection and key derivation, plus the
//! emptiness test shared by the passthrough rule and presence predicate.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::aliases::FingerprintKey32;
use crate::consts::CIPHER_KEY_LEN;
use crate::error::Result;

/// Content fingerprint used only for change detection
pub type Fingerprint = blake3::Hash;

/// BLAKE3 keyed hash over the canonical JSON serialization of `value`.
///
/// `serde_json` object maps are ordered, so equal values serialize to
/// equal bytes.
pub fn fingerprint(key: &FingerprintKey32, value: &Value) -> Result<Fingerprint> {
    let canonical = serde_json::to_vec(value)?;
    Ok(blake3::keyed_hash(key.expose_secret(), &canonical))
}

/// Nil or the empty string: never run through the cipher, in either direction
pub fn is_passthrough(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Nil, `false`, or anything with an emptiness notion that reports empty
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(_) => false,
    }
}

/// Derive a 256-bit cipher key from an application secret (SHA-256)
pub fn derive_key(secret: &str) -> [u8; CIPHER_KEY_LEN] {
    Sha256::digest(secret.as_bytes()).into()
}
