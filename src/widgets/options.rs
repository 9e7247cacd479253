//! Typed access to a descriptor's free-form `options` map and `default`.
//!
//! A missing key is `Ok(None)`; a key with the wrong JSON type is an
//! `InvalidDescriptor` naming the widget and the key.

use serde_json::Value as Json;

use crate::core::ConstructionError;
use crate::descriptor::WidgetDescriptor;

pub(crate) struct Options<'a> {
    desc: &'a WidgetDescriptor,
}

impl<'a> Options<'a> {
    pub fn new(desc: &'a WidgetDescriptor) -> Self {
        Self { desc }
    }

    fn get(&self, key: &str) -> Option<&'a Json> {
        self.desc.options.get(key).filter(|v| !v.is_null())
    }

    fn wrong_type(&self, key: &str, expected: &str) -> ConstructionError {
        ConstructionError::invalid(
            &self.desc.name,
            format!("option `{key}` must be {expected}"),
        )
    }

    pub fn usize(&self, key: &str) -> Result<Option<usize>, ConstructionError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| self.wrong_type(key, "a non-negative integer")),
        }
    }

    pub fn f64(&self, key: &str) -> Result<Option<f64>, ConstructionError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.wrong_type(key, "a number")),
        }
    }

    pub fn bool(&self, key: &str) -> Result<Option<bool>, ConstructionError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_bool()
                .map(Some)
                .ok_or_else(|| self.wrong_type(key, "a boolean")),
        }
    }

    pub fn str(&self, key: &str) -> Result<Option<&'a str>, ConstructionError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_str()
                .map(Some)
                .ok_or_else(|| self.wrong_type(key, "a string")),
        }
    }

    pub fn array(&self, key: &str) -> Result<&'a [Json], ConstructionError> {
        match self.get(key) {
            None => Ok(&[]),
            Some(v) => v
                .as_array()
                .map(Vec::as_slice)
                .ok_or_else(|| self.wrong_type(key, "a list")),
        }
    }

    // ── default value ───────────────────────────────────────────

    fn default_value(&self) -> Option<&'a Json> {
        self.desc.default.as_ref().filter(|v| !v.is_null())
    }

    fn wrong_default(&self, expected: &str) -> ConstructionError {
        ConstructionError::invalid(&self.desc.name, format!("default must be {expected}"))
    }

    pub fn default_str(&self) -> Result<Option<&'a str>, ConstructionError> {
        match self.default_value() {
            None => Ok(None),
            Some(v) => v.as_str().map(Some).ok_or_else(|| self.wrong_default("a string")),
        }
    }

    pub fn default_bool(&self) -> Result<Option<bool>, ConstructionError> {
        match self.default_value() {
            None => Ok(None),
            Some(v) => v.as_bool().map(Some).ok_or_else(|| self.wrong_default("a boolean")),
        }
    }

    pub fn default_f64(&self) -> Result<Option<f64>, ConstructionError> {
        match self.default_value() {
            None => Ok(None),
            Some(v) => v.as_f64().map(Some).ok_or_else(|| self.wrong_default("a number")),
        }
    }
}
