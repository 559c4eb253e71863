// src/config/mod.rs
//! Configuration system for encrypted-attrs
//!
//! Central, lazy-loaded global config with TOML + env overrides.

pub use app::{load, Config, Defaults, Secrets};
pub use defaults::default_attribute_options;

mod app;
mod defaults;
