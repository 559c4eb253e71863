//! Attribute Descriptor Registry
//!
//! One table per host type, mapping logical attribute names to descriptors,
//! plus the type's default options. A subtype's table starts life as a copy
//! of its parent's table the first time anything is registered on it, and the
//! two evolve independently from then on.
//!
//! The registry is populated during setup and read afterwards. Accessors clone
//! the `Arc<AttributeDescriptor>` they need and release the lock before running
//! any user callable.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::debug;

use crate::accessor::{decrypt_with, encrypt_with};
use crate::config::Config;
use crate::descriptor::{AttributeDescriptor, AttributeOptions, Overrides};
use crate::error::{CoreError, Result};
use crate::host::Stored;
use crate::options::OptionSpec;

/// Static description of a host type
#[derive(Debug, PartialEq, Eq)]
pub struct ModelType {
    pub name: &'static str,
    pub parent: Option<&'static ModelType>,
    /// Storage attributes the persistence layer provides readers/writers for
    pub attributes: &'static [&'static str],
}

impl ModelType {
    pub const fn new(name: &'static str, attributes: &'static [&'static str]) -> Self {
        Self {
            name,
            parent: None,
            attributes,
        }
    }

    pub const fn with_parent(self, parent: &'static ModelType) -> Self {
        Self {
            parent: Some(parent),
            ..self
        }
    }

    /// True if this type or any ancestor declares `attribute`
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.lineage().any(|m| m.attributes.contains(&attribute))
    }

    /// This type, then its parent, grandparent, ...
    pub fn lineage(&self) -> impl Iterator<Item = &ModelType> {
        std::iter::successors(Some(self), |m| m.parent)
    }
}

#[derive(Clone, Default)]
struct TypeTable {
    defaults: AttributeOptions,
    attributes: BTreeMap<String, Arc<AttributeDescriptor>>,
}

pub struct AttributeRegistry {
    base: AttributeOptions,
    tables: HashMap<&'static str, TypeTable>,
}

impl Default for AttributeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeRegistry {
    /// Registry with the built-in naming defaults and no default key
    pub fn new() -> Self {
        Self::with_defaults(crate::config::default_attribute_options())
    }

    pub fn with_defaults(base: AttributeOptions) -> Self {
        Self {
            base,
            tables: HashMap::new(),
        }
    }

    /// Registry whose defaults (naming, encoding, derived key) come from `config`
    pub fn from_config(config: &Config) -> Self {
        let mut base = AttributeOptions::new()
            .prefix(config.defaults.prefix.clone())
            .suffix(config.defaults.suffix.clone())
            .encode(config.defaults.encode)
            .marshal(config.defaults.marshal);
        if let Some(key) = config.default_key() {
            base = base.key(OptionSpec::Literal(key.to_vec()));
        }
        Self::with_defaults(base)
    }

    fn table_mut(&mut self, model: &'static ModelType) -> &mut TypeTable {
        if !self.tables.contains_key(model.name) {
            let inherited = match model.parent {
                Some(parent) => self.table_mut(parent).clone(),
                None => TypeTable::default(),
            };
            debug!(
                model = model.name,
                inherited = inherited.attributes.len(),
                "initialising attribute table"
            );
            self.tables.insert(model.name, inherited);
        }
        self.tables.entry(model.name).or_default()
    }

    /// Own table, or the nearest ancestor's if this type never registered anything
    fn table(&self, model: &ModelType) -> Option<&TypeTable> {
        model.lineage().find_map(|m| self.tables.get(m.name))
    }

    /// Merge `options` into the type's default options
    pub fn set_default_options(&mut self, model: &'static ModelType, options: AttributeOptions) {
        let table = self.table_mut(model);
        table.defaults = table.defaults.merge(&options);
    }

    /// Register `names` on `model`.
    ///
    /// Every storage attribute must already exist on the type; nothing is
    /// registered unless all names validate.
    pub fn register(
        &mut self,
        model: &'static ModelType,
        names: &[&str],
        options: AttributeOptions,
    ) -> Result<Vec<Arc<AttributeDescriptor>>> {
        if names.is_empty() {
            return Err(CoreError::Configuration(format!(
                "no attribute names given for `{}`",
                model.name
            )));
        }

        let base = self.base.clone();
        let table = self.table_mut(model);
        let merged = base.merge(&table.defaults).merge(&options);

        let descriptors = names
            .iter()
            .map(|name| {
                let descriptor = merged.build(name)?;
                if !model.has_attribute(descriptor.storage_name()) {
                    return Err(CoreError::Configuration(format!(
                        "`{}` has no storage attribute `{}` for `{name}`",
                        model.name,
                        descriptor.storage_name()
                    )));
                }
                Ok(Arc::new(descriptor))
            })
            .collect::<Result<Vec<_>>>()?;

        for descriptor in &descriptors {
            debug!(
                model = model.name,
                attribute = descriptor.logical_name(),
                storage = descriptor.storage_name(),
                "registered encrypted attribute"
            );
            table
                .attributes
                .insert(descriptor.logical_name().to_owned(), Arc::clone(descriptor));
        }
        Ok(descriptors)
    }

    pub fn is_registered(&self, model: &ModelType, name: &str) -> bool {
        self.table(model)
            .is_some_and(|t| t.attributes.contains_key(name))
    }

    pub fn descriptor(&self, model: &ModelType, name: &str) -> Result<Arc<AttributeDescriptor>> {
        self.table(model)
            .and_then(|t| t.attributes.get(name))
            .cloned()
            .ok_or_else(|| CoreError::AttributeNotRegistered(format!("{}.{name}", model.name)))
    }

    /// All descriptors for `model`, ordered by logical name
    pub fn descriptors(&self, model: &ModelType) -> Vec<Arc<AttributeDescriptor>> {
        self.table(model)
            .map(|t| t.attributes.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn attribute_names(&self, model: &ModelType) -> Vec<String> {
        self.table(model)
            .map(|t| t.attributes.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Class-level encryption: literal options only, unless `overrides` fill the gaps
    pub fn encrypt(
        &self,
        model: &ModelType,
        name: &str,
        value: &Value,
        overrides: &Overrides,
    ) -> Result<Option<Stored>> {
        let descriptor = self.descriptor(model, name)?;
        encrypt_with(&descriptor, None, overrides, value)
    }

    /// Class-level decryption; see [`encrypt`](Self::encrypt)
    pub fn decrypt(
        &self,
        model: &ModelType,
        name: &str,
        stored: Option<&Stored>,
        overrides: &Overrides,
    ) -> Result<Value> {
        let descriptor = self.descriptor(model, name)?;
        decrypt_with(&descriptor, None, overrides, stored)
    }
}

static GLOBAL: Lazy<RwLock<AttributeRegistry>> =
    Lazy::new(|| RwLock::new(AttributeRegistry::from_config(crate::config::load())));

/// The process-wide registry
pub fn global() -> &'static RwLock<AttributeRegistry> {
    &GLOBAL
}

// Descriptors are immutable once inserted, so a poisoned lock still holds valid data
pub(crate) fn read_global() -> RwLockReadGuard<'static, AttributeRegistry> {
    GLOBAL.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) fn write_global() -> RwLockWriteGuard<'static, AttributeRegistry> {
    GLOBAL.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Register `names` on `model` in the process-wide registry
pub fn register(
    model: &'static ModelType,
    names: &[&str],
    options: AttributeOptions,
) -> Result<Vec<Arc<AttributeDescriptor>>> {
    write_global().register(model, names, options)
}

/// Set default options for `model` in the process-wide registry
pub fn set_default_options(model: &'static ModelType, options: AttributeOptions) {
    write_global().set_default_options(model, options)
}

pub fn is_registered(model: &ModelType, name: &str) -> bool {
    read_global().is_registered(model, name)
}

pub fn encrypt(
    model: &ModelType,
    name: &str,
    value: &Value,
    overrides: &Overrides,
) -> Result<Option<Stored>> {
    let descriptor = read_global().descriptor(model, name)?;
    encrypt_with(&descriptor, None, overrides, value)
}

pub fn decrypt(
    model: &ModelType,
    name: &str,
    stored: Option<&Stored>,
    overrides: &Overrides,
) -> Result<Value> {
    let descriptor = read_global().descriptor(model, name)?;
    decrypt_with(&descriptor, None, overrides, stored)
}
