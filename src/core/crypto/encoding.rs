//! Outer text encoding. Wraps the whole envelope for text columns

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;

use crate::enums::OuterEncoding;
use crate::error::{CoreError, Result};

pub fn encode_outer(envelope: &[u8], encoding: OuterEncoding) -> String {
    match encoding {
        OuterEncoding::Base64 => STANDARD.encode(envelope),
        OuterEncoding::Base64UrlNoPad => URL_SAFE_NO_PAD.encode(envelope),
        OuterEncoding::Hex => hex::encode(envelope),
    }
}

pub fn decode_outer(text: &str, encoding: OuterEncoding) -> Result<Vec<u8>> {
    let decoded = match encoding {
        OuterEncoding::Base64 => STANDARD.decode(text).map_err(|e| e.to_string()),
        OuterEncoding::Base64UrlNoPad => URL_SAFE_NO_PAD.decode(text).map_err(|e| e.to_string()),
        OuterEncoding::Hex => hex::decode(text).map_err(|e| e.to_string()),
    };
    decoded.map_err(|e| CoreError::MalformedEnvelope(format!("outer {encoding:?} decoding: {e}")))
}
