//! Raw field values as supplied by a form or a JSON document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Unvalidated value for a single field.
///
/// JSON numbers without a fractional part deserialize as `Integer`, other
/// numbers as `Real`, strings as `Text`. Anything else (`null`, booleans,
/// arrays, objects) is kept as `Other` so the builder can reject it against
/// the field it was submitted for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Integer(i64),
    Real(f64),
    Text(String),
    Other(serde_json::Value),
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Mapping of field name to raw value for one submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawValues(BTreeMap<String, RawValue>);

impl RawValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Option<RawValue> {
        self.0.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<RawValue> {
        self.0.remove(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.0.get(name)
    }

    /// Field names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawValues
where
    K: Into<String>,
    V: Into<RawValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
