//! Pluggable cipher step
//!
//! The accessor layer resolves key, IV and pass-through parameters, then hands
//! them to an [`Encryptor`]. The default [`EnvelopeEncryptor`] produces the
//! 4-digit-length-prefixed AES-256-CBC envelope; custom implementations can
//! use `params` for anything they need.

use std::collections::BTreeMap;
use std::fmt;

use crate::core::crypto::{decrypt_envelope, encrypt_envelope};
use crate::error::Result;

/// Everything the cipher step sees for one call
#[derive(Clone, Copy)]
pub struct CipherRequest<'a> {
    pub value: &'a [u8],
    pub key: &'a [u8],
    /// Only meaningful when encrypting; decryption reads the IV from the envelope
    pub iv: Option<&'a [u8]>,
    pub params: &'a BTreeMap<String, String>,
}

impl fmt::Debug for CipherRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherRequest")
            .field("value_len", &self.value.len())
            .field("key", &"<redacted>")
            .field("iv_len", &self.iv.map(<[u8]>::len))
            .field("params", self.params)
            .finish()
    }
}

pub trait Encryptor: Send + Sync {
    /// Plaintext bytes → raw envelope bytes
    fn encrypt(&self, request: CipherRequest<'_>) -> Result<Vec<u8>>;

    /// Raw envelope bytes → plaintext bytes
    fn decrypt(&self, request: CipherRequest<'_>) -> Result<Vec<u8>>;
}

/// The standard envelope format (no integrity tag)
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeEncryptor;

impl Encryptor for EnvelopeEncryptor {
    fn encrypt(&self, request: CipherRequest<'_>) -> Result<Vec<u8>> {
        encrypt_envelope(request.value, request.key, request.iv)
    }

    fn decrypt(&self, request: CipherRequest<'_>) -> Result<Vec<u8>> {
        decrypt_envelope(request.value, request.key)
    }
}
