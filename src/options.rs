//! Option Resolver
//!
//! Attribute options are either fixed at registration time or computed from
//! the instance each time they are needed. [`OptionSpec`] is the closed set of
//! forms an option can take; [`OptionSpec::resolve`] turns it into a concrete
//! value. Nothing is memoized: a callable IV generator runs on every encryption.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{CoreError, Result};
use crate::host::Host;

/// What a host method returns for a method-reference option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bytes(Vec<u8>),
    Text(String),
    Flag(bool),
}

impl From<Vec<u8>> for OptionValue {
    fn from(bytes: Vec<u8>) -> Self {
        OptionValue::Bytes(bytes)
    }
}

impl From<&[u8]> for OptionValue {
    fn from(bytes: &[u8]) -> Self {
        OptionValue::Bytes(bytes.to_vec())
    }
}

impl From<String> for OptionValue {
    fn from(text: String) -> Self {
        OptionValue::Text(text)
    }
}

impl From<&str> for OptionValue {
    fn from(text: &str) -> Self {
        OptionValue::Text(text.to_owned())
    }
}

impl From<bool> for OptionValue {
    fn from(flag: bool) -> Self {
        OptionValue::Flag(flag)
    }
}

/// Conversion from a method result into the option's concrete type
pub trait FromOptionValue: Sized {
    fn from_option_value(value: OptionValue) -> Option<Self>;
}

impl FromOptionValue for Vec<u8> {
    fn from_option_value(value: OptionValue) -> Option<Self> {
        match value {
            OptionValue::Bytes(bytes) => Some(bytes),
            OptionValue::Text(text) => Some(text.into_bytes()),
            OptionValue::Flag(_) => None,
        }
    }
}

impl FromOptionValue for bool {
    fn from_option_value(value: OptionValue) -> Option<Self> {
        match value {
            OptionValue::Flag(flag) => Some(flag),
            _ => None,
        }
    }
}

type OptionFn<T> = Arc<dyn Fn(&dyn Host) -> T + Send + Sync>;
type FilterFn = Arc<dyn Fn(&dyn Host, Value) -> Value + Send + Sync>;

/// A configured option value
pub enum OptionSpec<T> {
    Literal(T),
    /// Name of a zero-argument method on the host
    Method(String),
    /// Called with the instance as its only argument
    Callable(OptionFn<T>),
}

impl<T> OptionSpec<T> {
    pub fn literal(value: impl Into<T>) -> Self {
        OptionSpec::Literal(value.into())
    }

    pub fn method(name: impl Into<String>) -> Self {
        OptionSpec::Method(name.into())
    }

    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&dyn Host) -> T + Send + Sync + 'static,
    {
        OptionSpec::Callable(Arc::new(f))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, OptionSpec::Literal(_))
    }
}

impl<T: Clone + FromOptionValue> OptionSpec<T> {
    /// Evaluate in the scope of `host`.
    ///
    /// Without a host only literals resolve; class-level encryption of an
    /// attribute with a method or callable key needs an override instead.
    pub fn resolve(&self, option: &str, host: Option<&dyn Host>) -> Result<T> {
        match self {
            OptionSpec::Literal(value) => Ok(value.clone()),
            OptionSpec::Method(name) => {
                let host = host.ok_or_else(|| {
                    CoreError::UnresolvedOption(format!(
                        "`{option}` refers to method `{name}` and needs an instance"
                    ))
                })?;
                let value = host.call_method(name).ok_or_else(|| {
                    CoreError::UnresolvedOption(format!(
                        "`{option}`: `{}` has no method `{name}`",
                        host.model().name
                    ))
                })?;
                T::from_option_value(value).ok_or_else(|| {
                    CoreError::UnresolvedOption(format!(
                        "`{option}`: method `{name}` returned the wrong kind of value"
                    ))
                })
            }
            OptionSpec::Callable(f) => {
                let host = host.ok_or_else(|| {
                    CoreError::UnresolvedOption(format!(
                        "`{option}` is computed per instance and needs an instance"
                    ))
                })?;
                Ok(f(host))
            }
        }
    }
}

impl<T: Clone> Clone for OptionSpec<T> {
    fn clone(&self) -> Self {
        match self {
            OptionSpec::Literal(value) => OptionSpec::Literal(value.clone()),
            OptionSpec::Method(name) => OptionSpec::Method(name.clone()),
            OptionSpec::Callable(f) => OptionSpec::Callable(Arc::clone(f)),
        }
    }
}

// Literals may be key material, so only the variant is printed
impl<T> fmt::Debug for OptionSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSpec::Literal(_) => f.write_str("Literal(..)"),
            OptionSpec::Method(name) => f.debug_tuple("Method").field(name).finish(),
            OptionSpec::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

/// A read or write transform applied to the logical value
#[derive(Clone)]
pub enum FilterSpec {
    /// Name of a one-argument method on the host
    Method(String),
    Callable(FilterFn),
}

impl FilterSpec {
    pub fn method(name: impl Into<String>) -> Self {
        FilterSpec::Method(name.into())
    }

    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&dyn Host, Value) -> Value + Send + Sync + 'static,
    {
        FilterSpec::Callable(Arc::new(f))
    }

    pub fn apply(&self, option: &str, host: &dyn Host, value: Value) -> Result<Value> {
        match self {
            FilterSpec::Method(name) => host.call_filter(name, value).ok_or_else(|| {
                CoreError::UnresolvedOption(format!(
                    "`{option}`: `{}` has no filter method `{name}`",
                    host.model().name
                ))
            }),
            FilterSpec::Callable(f) => Ok(f(host, value)),
        }
    }
}

impl fmt::Debug for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSpec::Method(name) => f.debug_tuple("Method").field(name).finish(),
            FilterSpec::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}
