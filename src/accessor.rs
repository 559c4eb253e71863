//! Accessor Contract and deferred write-back
//!
//! One generic implementation of the get / set / presence operations,
//! parameterised by an [`AttributeDescriptor`]. The descriptor-level functions
//! work with any registry; [`EncryptedAttributes`] wires them to the
//! process-wide one by attribute name.
//!
//! Reads decrypt once and cache the plaintext on the instance. Every read or
//! write re-baselines the attribute's fingerprint and marks it dirty, and
//! [`write_back`] re-encrypts whatever changed right before the host flushes.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::aliases::PlainText;
use crate::core::crypto::{decode_outer, encode_outer};
use crate::core::encryptor::CipherRequest;
use crate::core::util::{is_blank, is_passthrough};
use crate::descriptor::{AttributeDescriptor, Overrides, ResolvedOptions};
use crate::error::{CoreError, Result};
use crate::host::{Host, Stored};
use crate::registry::read_global;

/// Logical values that are stored without the cipher: nil maps to no stored
/// value and the empty string is stored as-is. No option is resolved for them.
fn passthrough(value: &Value) -> Option<Option<Stored>> {
    match value {
        Value::Null => Some(None),
        other if is_passthrough(other) => Some(Some(Stored::Plain(other.clone()))),
        _ => None,
    }
}

/// Storage value split by whether the cipher is needed to read it
enum Storage<'a> {
    Verbatim(Value),
    Raw(&'a [u8]),
    Encoded(&'a str),
}

fn classify(stored: Option<&Stored>) -> Storage<'_> {
    match stored {
        None => Storage::Verbatim(Value::Null),
        Some(Stored::Plain(value)) => Storage::Verbatim(value.clone()),
        Some(Stored::Envelope(bytes)) if bytes.is_empty() => {
            Storage::Verbatim(Value::String(String::new()))
        }
        Some(Stored::Encoded(text)) if text.is_empty() => {
            Storage::Verbatim(Value::String(String::new()))
        }
        Some(Stored::Envelope(bytes)) => Storage::Raw(bytes),
        Some(Stored::Encoded(text)) => Storage::Encoded(text),
    }
}

/// Logical value → storage form.
///
/// Nil and the empty string never reach the cipher. A failed condition
/// stores the value verbatim.
pub fn seal(resolved: &ResolvedOptions, value: &Value) -> Result<Option<Stored>> {
    if let Some(stored) = passthrough(value) {
        return Ok(stored);
    }
    if !resolved.condition {
        return Ok(Some(Stored::Plain(value.clone())));
    }

    let plaintext = PlainText::new(if resolved.marshal {
        serde_json::to_vec(value)?
    } else {
        match value {
            Value::String(s) => s.as_bytes().to_vec(),
            other => other.to_string().into_bytes(),
        }
    });

    let envelope = resolved.encryptor.encrypt(CipherRequest {
        value: plaintext.expose_secret(),
        key: resolved.key.expose_secret(),
        iv: resolved.iv.as_deref(),
        params: &resolved.params,
    })?;

    Ok(Some(match resolved.encode {
        Some(encoding) => Stored::Encoded(encode_outer(&envelope, encoding)),
        None => Stored::Envelope(envelope),
    }))
}

/// Storage form → logical value.
///
/// Plain values come back unchanged and empty envelopes read as the empty
/// string; only non-empty envelopes are decrypted.
pub fn open(resolved: &ResolvedOptions, stored: Option<&Stored>) -> Result<Value> {
    let envelope = match classify(stored) {
        Storage::Verbatim(value) => return Ok(value),
        Storage::Raw(bytes) => bytes.to_vec(),
        Storage::Encoded(text) => {
            let encoding = resolved.encode.ok_or_else(|| {
                CoreError::MalformedEnvelope(
                    "value is text-encoded but the attribute has no outer encoding".into(),
                )
            })?;
            decode_outer(text, encoding)?
        }
    };

    let plaintext = PlainText::new(resolved.encryptor.decrypt(CipherRequest {
        value: &envelope,
        key: resolved.key.expose_secret(),
        iv: None,
        params: &resolved.params,
    })?);

    if resolved.marshal {
        Ok(serde_json::from_slice(plaintext.expose_secret())?)
    } else {
        String::from_utf8(plaintext.expose_secret().clone())
            .map(Value::String)
            .map_err(|_| CoreError::Serialization("decrypted plaintext is not valid UTF-8".into()))
    }
}

/// Encrypt for `descriptor`, resolving options on `host` if there is one.
/// Passthrough values return before any option is resolved.
pub(crate) fn encrypt_with(
    descriptor: &AttributeDescriptor,
    host: Option<&dyn Host>,
    overrides: &Overrides,
    value: &Value,
) -> Result<Option<Stored>> {
    if let Some(stored) = passthrough(value) {
        return Ok(stored);
    }
    let resolved = descriptor.resolve_for_seal(host, overrides)?;
    let stored = seal(&resolved, value)?;
    debug!(
        attribute = descriptor.logical_name(),
        storage = descriptor.storage_name(),
        encrypted_len = stored.as_ref().and_then(Stored::encrypted_len),
        "sealed attribute value"
    );
    Ok(stored)
}

/// Decrypt for `descriptor`. Storage that reads back verbatim returns before
/// any option is resolved.
pub(crate) fn decrypt_with(
    descriptor: &AttributeDescriptor,
    host: Option<&dyn Host>,
    overrides: &Overrides,
    stored: Option<&Stored>,
) -> Result<Value> {
    if let Storage::Verbatim(value) = classify(stored) {
        return Ok(value);
    }
    let resolved = descriptor.resolve_for_open(host, overrides)?;
    debug!(
        attribute = descriptor.logical_name(),
        storage = descriptor.storage_name(),
        encrypted_len = stored.and_then(Stored::encrypted_len),
        "opening attribute value"
    );
    open(&resolved, stored)
}

/// Encrypt `value` for `descriptor` with options resolved on `host`
pub fn encrypt(
    host: &dyn Host,
    descriptor: &AttributeDescriptor,
    value: &Value,
) -> Result<Option<Stored>> {
    encrypt_with(descriptor, Some(host), &Overrides::default(), value)
}

/// Decrypt `stored` for `descriptor` with options resolved on `host`
pub fn decrypt(
    host: &dyn Host,
    descriptor: &AttributeDescriptor,
    stored: Option<&Stored>,
) -> Result<Value> {
    decrypt_with(descriptor, Some(host), &Overrides::default(), stored)
}

/// Decrypt into the cache if needed, then re-baseline and mark dirty.
/// A cached nil counts as not cached: storage may have been loaded since.
fn load<'h>(host: &'h mut dyn Host, descriptor: &AttributeDescriptor) -> Result<&'h mut Value> {
    let name = descriptor.logical_name();
    let cached = host
        .attribute_state()
        .cached(name)
        .is_some_and(|value| !value.is_null());
    let loaded = if cached {
        None
    } else {
        let stored = host.read_attribute(descriptor.storage_name());
        Some(decrypt(&*host, descriptor, stored)?)
    };
    host.attribute_state_mut().touch(name, loaded)
}

/// Getter: cached plaintext with the read filter applied
pub fn get(host: &mut dyn Host, descriptor: &AttributeDescriptor) -> Result<Value> {
    let value = load(host, descriptor)?.clone();
    match descriptor.read_filter() {
        Some(filter) => filter.apply("read_filter", &*host, value),
        None => Ok(value),
    }
}

/// Mutable access to the cached plaintext, for in-place changes that
/// [`write_back`] will pick up. Read filters are not applied.
pub fn get_mut<'h>(
    host: &'h mut dyn Host,
    descriptor: &AttributeDescriptor,
) -> Result<&'h mut Value> {
    load(host, descriptor)
}

/// Setter: write filter, encrypt into storage, cache the filtered value
pub fn set(host: &mut dyn Host, descriptor: &AttributeDescriptor, value: Value) -> Result<()> {
    let value = match descriptor.write_filter() {
        Some(filter) => filter.apply("write_filter", &*host, value)?,
        None => value,
    };
    let stored = encrypt(&*host, descriptor, &value)?;
    host.write_attribute(descriptor.storage_name(), stored);
    host.attribute_state_mut()
        .touch(descriptor.logical_name(), Some(value))?;
    Ok(())
}

/// Presence predicate. Goes through the getter, so it fills the cache.
pub fn is_present(host: &mut dyn Host, descriptor: &AttributeDescriptor) -> Result<bool> {
    Ok(!is_blank(&get(host, descriptor)?))
}

/// Re-encrypt every attribute whose cached plaintext changed or is dirty.
///
/// Call exactly once before each flush and abort the flush on error.
/// Returns the number of attributes re-encrypted.
pub fn write_back(host: &mut dyn Host, descriptors: &[Arc<AttributeDescriptor>]) -> Result<usize> {
    let mut written = 0;
    for descriptor in descriptors {
        let name = descriptor.logical_name();
        if !host.attribute_state().has_changed(name)? {
            continue;
        }
        let Some(value) = host.attribute_state().cached(name).cloned() else {
            continue;
        };
        // A nil that was only read says nothing about storage
        if value.is_null() && !host.attribute_state().has_diverged(name)? {
            host.attribute_state_mut().mark_clean(name)?;
            continue;
        }

        let stored = encrypt(&*host, descriptor, &value)?;
        host.write_attribute(descriptor.storage_name(), stored);
        host.attribute_state_mut().mark_clean(name)?;
        written += 1;
    }

    debug!(model = host.model().name, written, "write-back complete");
    Ok(written)
}

/// Name-based accessors over the process-wide registry
pub trait EncryptedAttributes: Host + Sized {
    fn read_encrypted(&mut self, name: &str) -> Result<Value> {
        let descriptor = read_global().descriptor(self.model(), name)?;
        get(self, &descriptor)
    }

    fn encrypted_mut(&mut self, name: &str) -> Result<&mut Value> {
        let descriptor = read_global().descriptor(self.model(), name)?;
        get_mut(self, &descriptor)
    }

    fn write_encrypted(&mut self, name: &str, value: Value) -> Result<()> {
        let descriptor = read_global().descriptor(self.model(), name)?;
        set(self, &descriptor, value)
    }

    fn encrypted_present(&mut self, name: &str) -> Result<bool> {
        let descriptor = read_global().descriptor(self.model(), name)?;
        is_present(self, &descriptor)
    }

    fn encrypt_attribute(&self, name: &str, value: &Value) -> Result<Option<Stored>> {
        let descriptor = read_global().descriptor(self.model(), name)?;
        encrypt(self, &descriptor, value)
    }

    fn decrypt_attribute(&self, name: &str, stored: Option<&Stored>) -> Result<Value> {
        let descriptor = read_global().descriptor(self.model(), name)?;
        decrypt(self, &descriptor, stored)
    }

    fn write_back_encrypted(&mut self) -> Result<usize> {
        let descriptors = read_global().descriptors(self.model());
        write_back(self, &descriptors)
    }
}

impl<H: Host> EncryptedAttributes for H {}
