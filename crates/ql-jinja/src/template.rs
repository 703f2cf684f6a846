//! Compiled SQL templates and their slot values

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A parameterized SQL text whose slots were checked at compile time.
///
/// Built only through [`TemplateEnvironment::compile`](crate::TemplateEnvironment::compile).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlTemplate {
    key: String,
    text: String,
    slots: BTreeSet<String>,
}

impl SqlTemplate {
    pub(crate) fn from_parts(key: &str, text: &str, slots: BTreeSet<String>) -> Self {
        Self {
            key: key.to_string(),
            text: text.to_string(),
            slots,
        }
    }

    /// Template key, e.g. `fully_loaded_cost_per_employee`
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw template text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Slots the template text actually references, in name order
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(String::as_str)
    }

    /// Whether the template references `slot`
    pub fn uses_slot(&self, slot: &str) -> bool {
        self.slots.contains(slot)
    }
}

/// Named values for template slots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SlotValues(BTreeMap<String, String>);

impl SlotValues {
    /// Create an empty set of slot values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, slot: &str, value: impl Into<String>) -> Self {
        self.set(slot, value);
        self
    }

    /// Set the value for a slot, replacing any previous value
    pub fn set(&mut self, slot: &str, value: impl Into<String>) {
        self.0.insert(slot.to_string(), value.into());
    }

    /// Whether a value has been provided for `slot`
    pub fn contains(&self, slot: &str) -> bool {
        self.0.contains_key(slot)
    }

    pub(crate) fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}
