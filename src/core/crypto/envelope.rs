//! Envelope framing: 4 ASCII decimal digits of IV length, the IV, then the ciphertext
//!
//! Layout: digits `[0, 4)`, IV `[4, 4 + n)`, ciphertext `[4 + n, end)`.
//! There is no separator byte and no integrity tag.

use crate::consts::{IV_LENGTH_DIGITS, MAX_IV_LENGTH};
use crate::error::{CoreError, Result};

/// Borrowed view of a parsed envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    pub iv: &'a [u8],
    pub ciphertext: &'a [u8],
}

impl<'a> Envelope<'a> {
    /// Split raw envelope bytes into IV and ciphertext
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        let digits = bytes.get(..IV_LENGTH_DIGITS).ok_or_else(|| {
            CoreError::MalformedEnvelope(format!(
                "envelope is {} bytes, shorter than the {IV_LENGTH_DIGITS}-digit length prefix",
                bytes.len()
            ))
        })?;

        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(CoreError::MalformedEnvelope(
                "length prefix is not 4 ASCII decimal digits".into(),
            ));
        }
        // All four bytes are ASCII digits, so this cannot overflow
        let iv_len = digits
            .iter()
            .fold(0usize, |acc, d| acc * 10 + usize::from(d - b'0'));

        let rest = &bytes[IV_LENGTH_DIGITS..];
        if iv_len > rest.len() {
            return Err(CoreError::MalformedEnvelope(format!(
                "declared IV length {iv_len} exceeds remaining {} bytes",
                rest.len()
            )));
        }

        let (iv, ciphertext) = rest.split_at(iv_len);
        Ok(Self { iv, ciphertext })
    }

    /// Re-serialize this view into owned envelope bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        frame(self.iv, self.ciphertext)
    }
}

/// Concatenate `pad4(len(iv)) || iv || ciphertext`
pub fn frame(iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if iv.len() > MAX_IV_LENGTH {
        return Err(CoreError::Configuration(format!(
            "IV is {} bytes; the envelope length prefix allows at most {MAX_IV_LENGTH}",
            iv.len()
        )));
    }

    let mut out = Vec::with_capacity(IV_LENGTH_DIGITS + iv.len() + ciphertext.len());
    out.extend_from_slice(format!("{:04}", iv.len()).as_bytes());
    out.extend_from_slice(iv);
    out.extend_from_slice(ciphertext);
    Ok(out)
}
