// src/aliases.rs
//! Re-exports secure-gate's ergonomic secret types
//!
//! These are the canonical secret types used throughout encrypted-attrs.

pub use secure_gate::{
    dynamic_alias, fixed_alias, random_alias, SecureConversionsExt, SecureRandomExt,
};

// Fixed-size secrets
fixed_alias!(CipherKey32, 32); // 256-bit AES key, zeroized on drop
fixed_alias!(FingerprintKey32, 32); // per-instance BLAKE3 key for change detection

// Dynamic secrets
dynamic_alias!(PlainText, Vec<u8>);
dynamic_alias!(KeyMaterial, Vec<u8>); // resolved key bytes, before truncation to 32

// Random secrets
random_alias!(RandomFingerprintKey32, 32);
