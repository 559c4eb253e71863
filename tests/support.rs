// tests/support.rs
//! Test utilities: an in-memory host record standing in for the persistence layer

use std::collections::HashMap;

use encrypted_attrs::{AttributeState, Host, ModelType, OptionValue, Stored};
use serde_json::Value;

/// 32-byte literal key used across tests
#[allow(dead_code)]
pub const KEY: &[u8; 32] = b"0123456789abcdef0123456789abcdef";

#[allow(dead_code)] // Fields are used by different test files
pub struct Record {
    model: &'static ModelType,
    columns: HashMap<String, Stored>,
    methods: HashMap<String, OptionValue>,
    state: AttributeState,
    pub writes: usize,
}

#[allow(dead_code)]
impl Record {
    pub fn new(model: &'static ModelType) -> Self {
        Self {
            model,
            columns: HashMap::new(),
            methods: HashMap::new(),
            state: AttributeState::new(),
            writes: 0,
        }
    }

    /// A zero-argument "method" answering method-reference options
    pub fn with_method(mut self, name: &str, value: impl Into<OptionValue>) -> Self {
        self.methods.insert(name.to_owned(), value.into());
        self
    }

    pub fn as_host(&self) -> &dyn Host {
        self
    }

    pub fn column(&self, name: &str) -> Option<&Stored> {
        self.columns.get(name)
    }

    /// Simulate loading a persisted row into a fresh instance
    pub fn reload(&self) -> Self {
        Self {
            model: self.model,
            columns: self.columns.clone(),
            methods: self.methods.clone(),
            state: AttributeState::new(),
            writes: 0,
        }
    }
}

impl Host for Record {
    fn model(&self) -> &'static ModelType {
        self.model
    }

    fn read_attribute(&self, name: &str) -> Option<&Stored> {
        self.columns.get(name)
    }

    fn write_attribute(&mut self, name: &str, value: Option<Stored>) {
        self.writes += 1;
        match value {
            Some(value) => {
                self.columns.insert(name.to_owned(), value);
            }
            None => {
                self.columns.remove(name);
            }
        }
    }

    fn call_method(&self, name: &str) -> Option<OptionValue> {
        self.methods.get(name).cloned()
    }

    fn call_filter(&self, name: &str, value: Value) -> Option<Value> {
        match (name, value) {
            ("upcase", Value::String(s)) => Some(Value::String(s.to_uppercase())),
            ("strip", Value::String(s)) => Some(Value::String(s.trim().to_owned())),
            (_, _) => None,
        }
    }

    fn attribute_state(&self) -> &AttributeState {
        &self.state
    }

    fn attribute_state_mut(&mut self) -> &mut AttributeState {
        &mut self.state
    }
}
