// tests/config_tests.rs
use std::io::Write;

use encrypted_attrs::config::Config;
use encrypted_attrs::core::util::derive_key;
use encrypted_attrs::error::CoreError;
use encrypted_attrs::OuterEncoding;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

#[test]
fn test_empty_config_uses_built_in_defaults() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config.defaults.prefix, "");
    assert_eq!(config.defaults.suffix, "_encrypted");
    assert_eq!(config.defaults.encode, None);
    assert!(!config.defaults.marshal);
    assert!(config.secrets.secret_token.is_none());
    assert!(config.default_key().is_none());
}

#[test]
fn test_full_config_parses() {
    let config = Config::from_toml_str(
        r#"
        [defaults]
        prefix = "crypted_"
        suffix = ""
        encode = "base64url"
        marshal = true

        [secrets]
        secret_token = "s3cr3t"
        "#,
    )
    .unwrap();

    assert_eq!(config.defaults.prefix, "crypted_");
    assert_eq!(config.defaults.suffix, "");
    assert_eq!(config.defaults.encode, Some(OuterEncoding::Base64UrlNoPad));
    assert!(config.defaults.marshal);
    assert_eq!(config.secrets.secret_token.as_deref(), Some("s3cr3t"));
}

#[test]
fn test_unknown_encoding_is_a_config_error() {
    let err = Config::from_toml_str("[defaults]\nencode = \"rot13\"\n").unwrap_err();
    assert!(matches!(err, CoreError::Config(_)));
}

#[test]
fn test_from_path_reads_toml_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[defaults]\nencode = \"hex\"").unwrap();

    let config = Config::from_path(file.path()).unwrap();
    assert_eq!(config.defaults.encode, Some(OuterEncoding::Hex));
    assert_eq!(config.defaults.suffix, "_encrypted");

    let missing = Config::from_path(file.path().with_extension("absent"));
    assert!(matches!(missing, Err(CoreError::Io(_))));
}

#[test]
fn test_default_key_is_sha256_of_secret_token() {
    let config = Config::from_toml_str("[secrets]\nsecret_token = \"app secret\"\n").unwrap();
    let expected: [u8; 32] = Sha256::digest(b"app secret").into();

    assert_eq!(config.default_key(), Some(expected));
    assert_eq!(derive_key("app secret"), expected);
}

#[test]
fn test_debug_output_redacts_secret_token() {
    let config = Config::from_toml_str("[secrets]\nsecret_token = \"hunter2\"\n").unwrap();
    let printed = format!("{config:?}");
    assert!(!printed.contains("hunter2"));
    assert!(printed.contains("<redacted>"));
}
