//=========================================================================
// Event Arguments
//=========================================================================
//
// String-keyed, string-valued payload carried by named events.
//
// Values are stored as text; readers parse them on demand and fall back
// to a caller-supplied default when the key is missing or unparsable.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

//=== EventArgs ===========================================================

/// Ordered key/value payload for [`super::EventSystem`] events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventArgs {
    values: BTreeMap<String, String>,
}

impl EventArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set_value`](Self::set_value).
    pub fn with_value(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.set_value(key, value);
        self
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set_value(&mut self, key: impl Into<String>, value: impl Display) {
        self.values.insert(key.into(), value.to_string());
    }

    /// Parses the value under `key`, or returns `default`.
    pub fn get_value<T: FromStr>(&self, key: &str, default: T) -> T {
        self.values
            .get(key)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Returns the raw text under `key`, or `default`.
    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
