//! Public enum types used throughout the crate
//!
//! Central location for user-visible choices an attribute can be
//! configured with.

use serde::{Deserialize, Serialize};

/// Text-safe encoding applied to the whole envelope before it is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OuterEncoding {
    /// RFC 4648 base64 with padding
    Base64,
    /// URL-safe base64 without padding
    #[serde(rename = "base64url")]
    Base64UrlNoPad,
    /// Lowercase hex
    Hex,
}
