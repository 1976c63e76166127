//! Invocation arguments.

use crate::outcome::Value;
use serde_json::Map;

/// Arguments passed with an invocation.
///
/// Hosts send either a map of named arguments or a single bare value. A bare
/// value is kept as the positional argument; `null` means "no arguments".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    named: Map<String, serde_json::Value>,
    positional: Option<serde_json::Value>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(named) => Self {
                named,
                positional: None,
            },
            serde_json::Value::Null => Self::default(),
            other => Self {
                named: Map::new(),
                positional: Some(other),
            },
        }
    }

    /// Add a named argument.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    pub fn with_positional(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.positional = Some(value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.named.get(name)
    }

    /// A named argument, only if it is a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(serde_json::Value::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    pub fn positional(&self) -> Option<&serde_json::Value> {
        self.positional.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.positional.is_none()
    }
}

impl From<Value> for Arguments {
    fn from(value: Value) -> Self {
        Self::from_json(value.to_json())
    }
}
