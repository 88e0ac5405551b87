//! Parsed configuration values.
//!
//! A closed tagged union for configuration documents; no `serde_json::Value`
//! here. Object keys keep insertion order, which model building relies on for
//! deterministic output.

use indexmap::IndexMap;

/// One parsed JSON value.
///
/// Integral literals that fit a 32-bit signed range parse as `Integer`, wider
/// ones as `LongInteger`, and anything with a fraction or exponent as `Float`.
/// That split is load-bearing: it drives field-type inference downstream.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    String(String),
    Integer(i32),
    LongInteger(i64),
    Float(f64),
    Boolean(bool),
    Null,
    Object(IndexMap<String, ConfigValue>),
    Array(Vec<ConfigValue>),
}

impl ConfigValue {
    pub fn as_object(&self) -> Option<&IndexMap<String, ConfigValue>> {
        match self {
            ConfigValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, ConfigValue::Object(_))
    }
}
