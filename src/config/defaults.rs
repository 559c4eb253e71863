use crate::config::app::{Defaults, Secrets};
use crate::consts::{DEFAULT_PREFIX, DEFAULT_SUFFIX};
use crate::descriptor::AttributeOptions;

pub fn default_defaults() -> Defaults {
    Defaults {
        prefix: DEFAULT_PREFIX.into(),
        suffix: DEFAULT_SUFFIX.into(),
        encode: None,
        marshal: false,
    }
}

pub fn default_secrets() -> Secrets {
    Secrets { secret_token: None }
}

/// Naming defaults only; there is no built-in key
pub fn default_attribute_options() -> AttributeOptions {
    AttributeOptions::new()
        .prefix(DEFAULT_PREFIX)
        .suffix(DEFAULT_SUFFIX)
}
