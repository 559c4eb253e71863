//! Attribute descriptors and the option bags they are built from
//!
//! [`AttributeOptions`] is what callers pass to
//! [`AttributeRegistry::register`](crate::registry::AttributeRegistry::register);
//! registration turns it into one immutable [`AttributeDescriptor`] per name.
//! At use time a descriptor resolves into [`ResolvedOptions`], optionally with
//! per-call [`Overrides`] on top.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::aliases::KeyMaterial;
use crate::core::encryptor::{Encryptor, EnvelopeEncryptor};
use crate::enums::OuterEncoding;
use crate::error::{CoreError, Result};
use crate::host::Host;
use crate::options::{FilterSpec, OptionSpec};

/// Registration options. Unset fields fall through to the type's defaults,
/// then to the registry-wide defaults.
#[derive(Clone, Default)]
pub struct AttributeOptions {
    prefix: Option<String>,
    suffix: Option<String>,
    attribute: Option<String>,
    key: Option<OptionSpec<Vec<u8>>>,
    iv: Option<OptionSpec<Vec<u8>>>,
    encode: Option<Option<OuterEncoding>>,
    marshal: Option<bool>,
    if_: Option<OptionSpec<bool>>,
    unless: Option<OptionSpec<bool>>,
    read_filter: Option<FilterSpec>,
    write_filter: Option<FilterSpec>,
    encryptor: Option<Arc<dyn Encryptor>>,
    params: BTreeMap<String, String>,
}

impl AttributeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Explicit storage attribute name, bypassing prefix/suffix
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attribute = Some(name.into());
        self
    }

    pub fn key(mut self, key: OptionSpec<Vec<u8>>) -> Self {
        self.key = Some(key);
        self
    }

    /// When unset, a random IV is generated for every encryption
    pub fn iv(mut self, iv: OptionSpec<Vec<u8>>) -> Self {
        self.iv = Some(iv);
        self
    }

    /// `None` explicitly turns off an inherited outer encoding
    pub fn encode(mut self, encoding: Option<OuterEncoding>) -> Self {
        self.encode = Some(encoding);
        self
    }

    pub fn marshal(mut self, marshal: bool) -> Self {
        self.marshal = Some(marshal);
        self
    }

    /// Encrypt only when this resolves to `true`
    pub fn if_(mut self, condition: OptionSpec<bool>) -> Self {
        self.if_ = Some(condition);
        self
    }

    /// Encrypt only when this resolves to `false`
    pub fn unless(mut self, condition: OptionSpec<bool>) -> Self {
        self.unless = Some(condition);
        self
    }

    pub fn read_filter(mut self, filter: FilterSpec) -> Self {
        self.read_filter = Some(filter);
        self
    }

    pub fn write_filter(mut self, filter: FilterSpec) -> Self {
        self.write_filter = Some(filter);
        self
    }

    pub fn encryptor(mut self, encryptor: Arc<dyn Encryptor>) -> Self {
        self.encryptor = Some(encryptor);
        self
    }

    /// Encryptor-specific parameter, forwarded verbatim
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Layer `over` on top of `self`; set fields in `over` win, params are unioned
    pub fn merge(&self, over: &AttributeOptions) -> AttributeOptions {
        let mut params = self.params.clone();
        params.extend(over.params.iter().map(|(k, v)| (k.clone(), v.clone())));

        AttributeOptions {
            prefix: over.prefix.clone().or_else(|| self.prefix.clone()),
            suffix: over.suffix.clone().or_else(|| self.suffix.clone()),
            attribute: over.attribute.clone().or_else(|| self.attribute.clone()),
            key: over.key.clone().or_else(|| self.key.clone()),
            iv: over.iv.clone().or_else(|| self.iv.clone()),
            encode: over.encode.or(self.encode),
            marshal: over.marshal.or(self.marshal),
            if_: over.if_.clone().or_else(|| self.if_.clone()),
            unless: over.unless.clone().or_else(|| self.unless.clone()),
            read_filter: over.read_filter.clone().or_else(|| self.read_filter.clone()),
            write_filter: over
                .write_filter
                .clone()
                .or_else(|| self.write_filter.clone()),
            encryptor: over.encryptor.clone().or_else(|| self.encryptor.clone()),
            params,
        }
    }

    /// Storage attribute name for `logical`
    pub fn storage_name_for(&self, logical: &str) -> String {
        match &self.attribute {
            Some(explicit) => explicit.clone(),
            None => format!(
                "{}{logical}{}",
                self.prefix.as_deref().unwrap_or_default(),
                self.suffix.as_deref().unwrap_or_default()
            ),
        }
    }

    /// Freeze into a descriptor for `logical`
    pub fn build(&self, logical: &str) -> Result<AttributeDescriptor> {
        if logical.is_empty() {
            return Err(CoreError::Configuration(
                "attribute name must not be empty".into(),
            ));
        }

        let storage_name = self.storage_name_for(logical);
        if storage_name == logical {
            return Err(CoreError::Configuration(format!(
                "`{logical}` cannot be its own storage attribute; set a prefix, suffix or attribute"
            )));
        }

        let key = self.key.clone().ok_or_else(|| {
            CoreError::Configuration(format!("no key configured for `{logical}`"))
        })?;

        Ok(AttributeDescriptor {
            logical_name: logical.to_owned(),
            storage_name,
            key,
            iv: self.iv.clone(),
            encode: self.encode.flatten(),
            marshal: self.marshal.unwrap_or(false),
            if_: self.if_.clone().unwrap_or(OptionSpec::Literal(true)),
            unless: self.unless.clone().unwrap_or(OptionSpec::Literal(false)),
            read_filter: self.read_filter.clone(),
            write_filter: self.write_filter.clone(),
            encryptor: self
                .encryptor
                .clone()
                .unwrap_or_else(|| Arc::new(EnvelopeEncryptor)),
            params: self.params.clone(),
        })
    }
}

impl fmt::Debug for AttributeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeOptions")
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("attribute", &self.attribute)
            .field("key", &self.key)
            .field("iv", &self.iv)
            .field("encode", &self.encode)
            .field("marshal", &self.marshal)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Immutable per-attribute configuration
#[derive(Clone)]
pub struct AttributeDescriptor {
    logical_name: String,
    storage_name: String,
    key: OptionSpec<Vec<u8>>,
    iv: Option<OptionSpec<Vec<u8>>>,
    encode: Option<OuterEncoding>,
    marshal: bool,
    if_: OptionSpec<bool>,
    unless: OptionSpec<bool>,
    read_filter: Option<FilterSpec>,
    write_filter: Option<FilterSpec>,
    encryptor: Arc<dyn Encryptor>,
    params: BTreeMap<String, String>,
}

impl AttributeDescriptor {
    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    pub fn storage_name(&self) -> &str {
        &self.storage_name
    }

    pub fn key(&self) -> &OptionSpec<Vec<u8>> {
        &self.key
    }

    pub fn iv(&self) -> Option<&OptionSpec<Vec<u8>>> {
        self.iv.as_ref()
    }

    pub fn encode(&self) -> Option<OuterEncoding> {
        self.encode
    }

    pub fn marshal(&self) -> bool {
        self.marshal
    }

    pub fn read_filter(&self) -> Option<&FilterSpec> {
        self.read_filter.as_ref()
    }

    pub fn write_filter(&self) -> Option<&FilterSpec> {
        self.write_filter.as_ref()
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Resolve the options needed to encrypt one value.
    ///
    /// `host == None` is the class-level path: only literals and overrides resolve.
    pub fn resolve_for_seal(
        &self,
        host: Option<&dyn Host>,
        overrides: &Overrides,
    ) -> Result<ResolvedOptions> {
        self.resolve(host, overrides, true)
    }

    /// Resolve the options needed to decrypt one value.
    ///
    /// The IV comes from the envelope and decryption does not depend on the
    /// condition, so neither option is evaluated here.
    pub fn resolve_for_open(
        &self,
        host: Option<&dyn Host>,
        overrides: &Overrides,
    ) -> Result<ResolvedOptions> {
        self.resolve(host, overrides, false)
    }

    fn resolve(
        &self,
        host: Option<&dyn Host>,
        overrides: &Overrides,
        sealing: bool,
    ) -> Result<ResolvedOptions> {
        let key = match &overrides.key {
            Some(key) => key.clone(),
            None => self.key.resolve("key", host)?,
        };

        let iv = match (&overrides.iv, &self.iv) {
            (Some(iv), _) => Some(iv.clone()),
            (None, Some(spec)) if sealing => Some(spec.resolve("iv", host)?),
            (None, _) => None,
        };

        let condition = match overrides.condition {
            Some(condition) => condition,
            None if sealing => {
                self.if_.resolve("if", host)? && !self.unless.resolve("unless", host)?
            }
            None => true,
        };

        let mut params = self.params.clone();
        params.extend(overrides.params.iter().map(|(k, v)| (k.clone(), v.clone())));

        Ok(ResolvedOptions {
            key: KeyMaterial::new(key),
            iv,
            encode: overrides.encode.unwrap_or(self.encode),
            marshal: overrides.marshal.unwrap_or(self.marshal),
            condition,
            encryptor: Arc::clone(&self.encryptor),
            params,
        })
    }
}

impl fmt::Debug for AttributeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeDescriptor")
            .field("logical_name", &self.logical_name)
            .field("storage_name", &self.storage_name)
            .field("key", &self.key)
            .field("iv", &self.iv)
            .field("encode", &self.encode)
            .field("marshal", &self.marshal)
            .field("if", &self.if_)
            .field("unless", &self.unless)
            .field("read_filter", &self.read_filter)
            .field("write_filter", &self.write_filter)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Per-call replacements for resolved options
#[derive(Clone, Default)]
pub struct Overrides {
    key: Option<Vec<u8>>,
    iv: Option<Vec<u8>>,
    encode: Option<Option<OuterEncoding>>,
    marshal: Option<bool>,
    condition: Option<bool>,
    params: BTreeMap<String, String>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn iv(mut self, iv: impl Into<Vec<u8>>) -> Self {
        self.iv = Some(iv.into());
        self
    }

    pub fn encode(mut self, encoding: Option<OuterEncoding>) -> Self {
        self.encode = Some(encoding);
        self
    }

    pub fn marshal(mut self, marshal: bool) -> Self {
        self.marshal = Some(marshal);
        self
    }

    /// Replaces the combined `if`/`unless` outcome
    pub fn condition(mut self, condition: bool) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

impl fmt::Debug for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overrides")
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("iv_len", &self.iv.as_ref().map(Vec::len))
            .field("encode", &self.encode)
            .field("marshal", &self.marshal)
            .field("condition", &self.condition)
            .field("params", &self.params)
            .finish()
    }
}

/// Concrete options for one call
pub struct ResolvedOptions {
    pub key: KeyMaterial,
    /// Always `None` when resolved for decryption unless overridden
    pub iv: Option<Vec<u8>>,
    pub encode: Option<OuterEncoding>,
    pub marshal: bool,
    /// `if` passed and `unless` did not. Only evaluated for encryption.
    pub condition: bool,
    pub encryptor: Arc<dyn Encryptor>,
    pub params: BTreeMap<String, String>,
}

impl fmt::Debug for ResolvedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedOptions")
            .field("key", &"<redacted>")
            .field("iv_len", &self.iv.as_ref().map(Vec::len))
            .field("encode", &self.encode)
            .field("marshal", &self.marshal)
            .field("condition", &self.condition)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
