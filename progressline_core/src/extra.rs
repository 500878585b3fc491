//! Per-bar storage for widget state that outlives a single render

use crate::error::ValidationError;
use crate::samples::SampleBuffer;
use crate::Result;
use serde::Serialize;
use std::collections::HashMap;

/// A value stored in [`ExtraData`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtraValue {
    Samples(SampleBuffer),
    Value(serde_json::Value),
}

impl From<SampleBuffer> for ExtraValue {
    fn from(buffer: SampleBuffer) -> Self {
        Self::Samples(buffer)
    }
}

impl From<serde_json::Value> for ExtraValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Value(value)
    }
}

/// Mapping owned by a bar instance and lent to widgets while rendering
///
/// Widgets are shared between bars, so anything they remember between
/// renders is stored here under a key prefixed with the widget's name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtraData {
    entries: HashMap<String, ExtraValue>,
}

impl ExtraData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample buffer stored under `key`, created with `capacity` if absent
    ///
    /// Fails when `key` already holds a non-sample value.
    pub fn samples_mut(&mut self, key: &str, capacity: usize) -> Result<&mut SampleBuffer> {
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| ExtraValue::Samples(SampleBuffer::new(capacity)));

        match entry {
            ExtraValue::Samples(buffer) => Ok(buffer),
            ExtraValue::Value(_) => Err(ValidationError::invalid_configuration(&format!(
                "extra key '{key}' already holds a non-sample value"
            ))
            .into()),
        }
    }

    pub fn samples(&self, key: &str) -> Option<&SampleBuffer> {
        match self.entries.get(key)? {
            ExtraValue::Samples(buffer) => Some(buffer),
            ExtraValue::Value(_) => None,
        }
    }

    pub fn value(&self, key: &str) -> Option<&serde_json::Value> {
        match self.entries.get(key)? {
            ExtraValue::Value(value) => Some(value),
            ExtraValue::Samples(_) => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&ExtraValue> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ExtraValue>) -> Option<ExtraValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<ExtraValue> {
        self.entries.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
