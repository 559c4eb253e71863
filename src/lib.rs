// src/lib.rs
//! encrypted-attrs: transparently encrypted attributes for stateful objects
//!
//! Features:
//! - AES-256-CBC envelopes with a 4-digit IV length prefix
//! - Per-instance keys, IVs, conditions and filters
//! - Per-type attribute registry with copy-on-first-write inheritance
//! - BLAKE3-fingerprinted change tracking with deferred write-back
//! - Full secure-gate integration for key material

pub mod accessor;
pub mod aliases;
pub mod config;
pub mod consts;
pub mod core;
pub mod descriptor;
pub mod enums;
pub mod host;
pub mod options;
pub mod registry;
pub mod tracker;

pub mod error;

// Re-export everything users need at the crate root
pub use accessor::EncryptedAttributes;
pub use config::load as load_config;
pub use crate::core::{decrypt_envelope, encrypt_envelope, Encryptor, EnvelopeEncryptor};
pub use descriptor::{AttributeDescriptor, AttributeOptions, Overrides};
pub use enums::OuterEncoding;
pub use error::{CoreError, Result as CoreResult};
pub use host::{Host, Stored};
pub use options::{FilterSpec, OptionSpec, OptionValue};
pub use registry::{AttributeRegistry, ModelType};
pub use tracker::AttributeState;
