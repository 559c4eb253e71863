// src/core/crypto/encrypt.rs
use cbc::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};
use rand::RngCore;

use super::{cipher_key, frame};
use crate::aliases::CipherKey32;
use crate::consts::CIPHER_IV_LEN;
use crate::error::{CoreError, Result};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;

/// Fresh IV from the thread-local CSPRNG
pub fn generate_iv() -> [u8; CIPHER_IV_LEN] {
    let mut iv = [0u8; CIPHER_IV_LEN];
    rand::rng().fill_bytes(&mut iv);
    iv
}

/// Encrypt plaintext → raw AES-256-CBC ciphertext (in-memory, PKCS#7 padded)
pub fn encrypt_to_vec(plaintext: &[u8], key: &CipherKey32, iv: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256CbcEnc::new_from_slices(key.expose_secret(), iv).map_err(|_| {
        CoreError::InvalidIvLength {
            expected: CIPHER_IV_LEN,
            actual: iv.len(),
        }
    })?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Encrypt plaintext → envelope bytes
///
/// With `iv == None` a random IV is generated, so two calls on the same
/// plaintext give different envelopes. A fixed IV makes the output deterministic.
pub fn encrypt_envelope(plaintext: &[u8], key: &[u8], iv: Option<&[u8]>) -> Result<Vec<u8>> {
    let key = cipher_key(key)?;
    let random;
    let iv = match iv {
        Some(iv) => iv,
        None => {
            random = generate_iv();
            &random[..]
        }
    };

    let ciphertext = encrypt_to_vec(plaintext, &key, iv)?;
    frame(iv, &ciphertext)
}
