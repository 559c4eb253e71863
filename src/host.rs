//! The host-side interface: what a stateful object must expose so its
//! logical attributes can be backed by encrypted storage attributes.
//!
//! The persistence layer (save/update lifecycle, column mapping) is outside
//! this crate. It implements [`Host`] and calls
//! [`write_back`](crate::accessor::write_back) once before every flush.

use serde_json::Value;

use crate::options::OptionValue;
use crate::registry::ModelType;
use crate::tracker::AttributeState;

/// Value held by a storage attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stored {
    /// Raw envelope bytes (no outer encoding configured)
    Envelope(Vec<u8>),
    /// Envelope wrapped in the attribute's outer text encoding
    Encoded(String),
    /// Unencrypted value: the passthrough rule or a failed condition
    Plain(Value),
}

impl Stored {
    pub fn is_encrypted(&self) -> bool {
        !matches!(self, Stored::Plain(_))
    }

    /// Length of the stored envelope, raw or encoded
    pub fn encrypted_len(&self) -> Option<usize> {
        match self {
            Stored::Envelope(bytes) => Some(bytes.len()),
            Stored::Encoded(text) => Some(text.len()),
            Stored::Plain(_) => None,
        }
    }
}

pub trait Host {
    /// Static type information, used for registry lookup
    fn model(&self) -> &'static ModelType;

    fn read_attribute(&self, name: &str) -> Option<&Stored>;

    fn write_attribute(&mut self, name: &str, value: Option<Stored>);

    /// Zero-argument method lookup for [`OptionSpec::Method`](crate::options::OptionSpec::Method).
    /// `None` means the host has no such method.
    fn call_method(&self, _name: &str) -> Option<OptionValue> {
        None
    }

    /// One-argument transform lookup for [`FilterSpec::Method`](crate::options::FilterSpec::Method)
    fn call_filter(&self, _name: &str, _value: Value) -> Option<Value> {
        None
    }

    fn attribute_state(&self) -> &AttributeState;

    fn attribute_state_mut(&mut self) -> &mut AttributeState;
}
