// src/core/mod.rs
pub mod crypto;
pub mod encryptor;
pub mod util;

pub use crypto::*;
pub use encryptor::*;
pub use util::*;
