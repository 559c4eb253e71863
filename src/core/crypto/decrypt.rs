// src/core/crypto/decrypt.rs
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};

use super::{cipher_key, Envelope};
use crate::aliases::CipherKey32;
use crate::error::{CoreError, Result};

type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Decrypt raw AES-256-CBC ciphertext → plaintext (in-memory)
pub fn decrypt_to_vec(ciphertext: &[u8], key: &CipherKey32, iv: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256CbcDec::new_from_slices(key.expose_secret(), iv).map_err(|_| {
        CoreError::DecryptionFailed(format!("IV of {} bytes is not usable", iv.len()))
    })?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CoreError::DecryptionFailed("bad padding or ciphertext length".into()))
}

/// Decrypt envelope bytes → plaintext
///
/// A wrong key usually, but not always, surfaces as a padding failure.
pub fn decrypt_envelope(envelope: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let key = cipher_key(key)?;
    let parsed = Envelope::parse(envelope)?;
    decrypt_to_vec(parsed.ciphertext, &key, parsed.iv)
}
