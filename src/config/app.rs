use super::defaults::*;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;
use tracing::warn;

use crate::consts::{CIPHER_KEY_LEN, CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE, SECRET_TOKEN_ENV};
use crate::core::util::derive_key;
use crate::enums::OuterEncoding;
use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_defaults")]
    pub defaults: Defaults,
    #[serde(default = "default_secrets")]
    pub secrets: Secrets,
}

/// Registry-wide attribute defaults
#[derive(Debug, Clone, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    pub prefix: String,
    #[serde(default = "default_suffix")]
    pub suffix: String,
    #[serde(default)]
    pub encode: Option<OuterEncoding>,
    #[serde(default)]
    pub marshal: bool,
}

#[derive(Clone, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub secret_token: Option<String>,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("secret_token", &self.secret_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn default_suffix() -> String {
    default_defaults().suffix
}

impl Default for Config {
    fn default() -> Self {
        Config {
            defaults: default_defaults(),
            secrets: default_secrets(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// `ENCRYPTED_ATTRS_SECRET` replaces the file's secret token
    pub fn apply_env(mut self) -> Self {
        if let Ok(secret) = std::env::var(SECRET_TOKEN_ENV) {
            self.secrets.secret_token = Some(secret);
        }
        self
    }

    /// Default cipher key, derived from the secret token when one is configured
    pub fn default_key(&self) -> Option<[u8; CIPHER_KEY_LEN]> {
        self.secrets.secret_token.as_deref().map(derive_key)
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load config once. Falls back to defaults if the file is missing or invalid
pub fn load() -> &'static Config {
    CONFIG.get_or_init(|| {
        let config_path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let conf = if Path::new(&config_path).exists() {
            Config::from_path(&config_path).unwrap_or_else(|err| {
                warn!(path = %config_path, error = %err, "invalid config, using built-in defaults");
                Config::default()
            })
        } else {
            warn!(path = %config_path, "config not found, using built-in defaults");
            Config::default()
        };

        conf.apply_env()
    })
}
