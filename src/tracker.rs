//! Per-instance plaintext cache and Change Tracker
//!
//! A logical value can be mutated in place after it was read, without going
//! through the setter. The tracker keeps, per attribute, a fingerprint of the
//! plaintext as of the last read/write plus a dirty flag, so the host can
//! re-encrypt exactly the attributes that need it at the next flush.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;

use serde_json::Value;

use crate::aliases::{FingerprintKey32, RandomFingerprintKey32, SecureRandomExt};
use crate::core::util::{fingerprint, Fingerprint};
use crate::error::Result;

pub struct AttributeState {
    fingerprint_key: FingerprintKey32,
    plaintext: HashMap<String, Value>,
    baseline: HashMap<String, Fingerprint>,
    dirty: HashSet<String>,
}

impl AttributeState {
    /// Empty state with a fresh random fingerprint key
    pub fn new() -> Self {
        Self {
            fingerprint_key: FingerprintKey32::new(**RandomFingerprintKey32::new()),
            plaintext: HashMap::new(),
            baseline: HashMap::new(),
            dirty: HashSet::new(),
        }
    }

    pub fn cached(&self, name: &str) -> Option<&Value> {
        self.plaintext.get(name)
    }

    /// Record a read or write of `name`.
    ///
    /// `loaded` replaces the cached plaintext when given. The current
    /// plaintext becomes the new baseline and the attribute is marked dirty,
    /// since the caller may now hold it mutably.
    pub fn touch(&mut self, name: &str, loaded: Option<Value>) -> Result<&mut Value> {
        let slot = self.plaintext.entry(name.to_owned());
        let value = match loaded {
            Some(value) => match slot {
                Entry::Occupied(mut entry) => {
                    entry.insert(value);
                    entry.into_mut()
                }
                Entry::Vacant(entry) => entry.insert(value),
            },
            None => slot.or_insert(Value::Null),
        };

        let digest = fingerprint(&self.fingerprint_key, value)?;
        self.baseline.insert(name.to_owned(), digest);
        self.dirty.insert(name.to_owned());
        Ok(value)
    }

    /// Fingerprint differs from the baseline, or the dirty flag is set.
    /// Attributes never read or written have nothing to write back.
    pub fn has_changed(&self, name: &str) -> Result<bool> {
        if !self.plaintext.contains_key(name) {
            return Ok(false);
        }
        if self.dirty.contains(name) {
            return Ok(true);
        }
        self.has_diverged(name)
    }

    /// Fingerprint differs from the baseline, ignoring the dirty flag
    pub fn has_diverged(&self, name: &str) -> Result<bool> {
        let Some(value) = self.plaintext.get(name) else {
            return Ok(false);
        };
        let current = fingerprint(&self.fingerprint_key, value)?;
        Ok(self.baseline.get(name) != Some(&current))
    }

    pub fn is_dirty(&self, name: &str) -> bool {
        self.dirty.contains(name)
    }

    /// Storage now matches the cache: refresh the baseline, clear dirty
    pub fn mark_clean(&mut self, name: &str) -> Result<()> {
        if let Some(value) = self.plaintext.get(name) {
            let digest = fingerprint(&self.fingerprint_key, value)?;
            self.baseline.insert(name.to_owned(), digest);
        }
        self.dirty.remove(name);
        Ok(())
    }

    /// Drop the cached plaintext so the next read decrypts storage again
    pub fn forget(&mut self, name: &str) {
        self.plaintext.remove(name);
        self.baseline.remove(name);
        self.dirty.remove(name);
    }

    pub fn tracked(&self) -> impl Iterator<Item = &str> {
        self.plaintext.keys().map(String::as_str)
    }
}

impl Default for AttributeState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AttributeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tracked: Vec<_> = self.tracked().collect();
        tracked.sort_unstable();
        f.debug_struct("AttributeState")
            .field("tracked", &tracked)
            .field("dirty", &self.dirty.len())
            .finish_non_exhaustive()
    }
}
