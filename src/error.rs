// src/error.rs
//! Public error type for the entire crate

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    /// Registration-time failure: missing storage accessor, malformed option
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Length prefix unparseable or shorter than the declared IV
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Cipher-level failure. Wrong key, corrupted ciphertext and tampering
    /// all look the same here: the envelope carries no integrity tag.
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Attribute not registered: {0}")]
    AttributeNotRegistered(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid key length: expected at least {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("Invalid IV length: expected {expected} bytes, got {actual}")]
    InvalidIvLength { expected: usize, actual: usize },

    /// A method-reference option named something the host does not answer to,
    /// or an option that needs an instance was resolved without one
    #[error("Unresolved option: {0}")]
    UnresolvedOption(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        CoreError::Config(err.to_string())
    }
}
