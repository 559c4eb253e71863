//! Shared constants: envelope framing, cipher parameters and naming defaults

/// Number of ASCII decimal digits in the envelope's IV length prefix
pub const IV_LENGTH_DIGITS: usize = 4;

/// Largest IV length the 4-digit prefix can express
pub const MAX_IV_LENGTH: usize = 9_999;

/// AES-256 key size in bytes
pub const CIPHER_KEY_LEN: usize = 32;

/// AES block size, which is also the CBC IV size
pub const CIPHER_IV_LEN: usize = 16;

/// Default storage-name prefix (`email` → `email_encrypted`)
pub const DEFAULT_PREFIX: &str = "";

/// Default storage-name suffix
pub const DEFAULT_SUFFIX: &str = "_encrypted";

/// Env var naming the TOML config file
pub const CONFIG_PATH_ENV: &str = "ENCRYPTED_ATTRS_CONFIG";

/// Env var overriding `[secrets] secret_token`
pub const SECRET_TOKEN_ENV: &str = "ENCRYPTED_ATTRS_SECRET";

/// Config file used when `ENCRYPTED_ATTRS_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "encrypted-attrs.toml";
