use serde_json::{Map, Value};

use crate::error::{Result, SchemaError};

/// A single parameter as supplied by the caller.
///
/// `Undefined` marks a key that is present but carries no value. It is
/// distinct from the key being absent and from an explicit JSON `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Undefined,
    Value(Value),
}

impl ParamValue {
    pub fn is_undefined(&self) -> bool {
        matches!(self, ParamValue::Undefined)
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ParamValue::Undefined => None,
            ParamValue::Value(value) => Some(value),
        }
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        ParamValue::Value(value)
    }
}

impl From<Option<Value>> for ParamValue {
    fn from(value: Option<Value>) -> Self {
        value.map_or(ParamValue::Undefined, ParamValue::Value)
    }
}

/// How a field appears in a value bag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot<'a> {
    Absent,
    Undefined,
    Null,
    Present(&'a Value),
}

/// Insertion-ordered parameter map.
///
/// Re-inserting an existing key replaces its value in place, so iteration
/// order is always first-insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueBag {
    entries: Vec<(String, ParamValue)>,
}

impl ValueBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter().position(|(k, _)| *k == key) {
            Some(index) => self.entries[index].1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Insert a key that is present but explicitly undefined.
    pub fn insert_undefined(&mut self, key: impl Into<String>) -> &mut Self {
        self.insert(key, ParamValue::Undefined)
    }

    /// Builder-style [`ValueBag::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Classify a key as absent, undefined, null, or present.
    pub fn slot(&self, key: &str) -> Slot<'_> {
        match self.get(key) {
            None => Slot::Absent,
            Some(ParamValue::Undefined) => Slot::Undefined,
            Some(ParamValue::Value(Value::Null)) => Slot::Null,
            Some(ParamValue::Value(value)) => Slot::Present(value),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a bag from a JSON object. JSON cannot express an undefined
    /// value, so every key becomes a concrete value (possibly `null`).
    pub fn from_json_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::from(map)),
            other => Err(SchemaError::NotAnObject(document_kind(&other))),
        }
    }

    /// Parse a JSON object payload into a bag.
    pub fn from_json_slice(payload: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(payload)?;
        Self::from_json_value(value)
    }
}

impl From<Map<String, Value>> for ValueBag {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            entries: map
                .into_iter()
                .map(|(k, v)| (k, ParamValue::Value(v)))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ValueBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = ValueBag::new();
        for (key, value) in iter {
            bag.insert(key, value);
        }
        bag
    }
}

/// Name of a JSON value's runtime kind, using `object` for null, arrays and
/// objects alike.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Null | Value::Array(_) | Value::Object(_) => "object",
    }
}

/// JSON type name as a document author would say it.
pub(crate) fn document_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Array(_) => "array",
        other => json_kind(other),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn slot_distinguishes_four_states() {
        let bag = ValueBag::new()
            .with("present", json!("x"))
            .with("null", Value::Null)
            .with("undefined", ParamValue::Undefined);

        assert_eq!(bag.slot("present"), Slot::Present(&json!("x")));
        assert_eq!(bag.slot("null"), Slot::Null);
        assert_eq!(bag.slot("undefined"), Slot::Undefined);
        assert_eq!(bag.slot("missing"), Slot::Absent);
    }

    #[test]
    fn reinsert_keeps_first_position() {
        let mut bag = ValueBag::new();
        bag.insert("a", json!(1)).insert("b", json!(2)).insert("a", json!(3));

        assert_eq!(bag.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(bag.get("a"), Some(&ParamValue::Value(json!(3))));
    }

    #[test]
    fn from_json_preserves_payload_order() {
        let bag = ValueBag::from_json_slice(br#"{"zeta":1,"alpha":null,"mid":"m"}"#).unwrap();
        assert_eq!(bag.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(bag.slot("alpha"), Slot::Null);
    }

    #[test]
    fn from_json_rejects_non_objects() {
        assert!(matches!(
            ValueBag::from_json_slice(b"[1,2]"),
            Err(SchemaError::NotAnObject("array"))
        ));
        assert!(matches!(
            ValueBag::from_json_slice(b"\"text\""),
            Err(SchemaError::NotAnObject("string"))
        ));
        assert!(matches!(
            ValueBag::from_json_slice(b"{oops"),
            Err(SchemaError::InvalidJson(_))
        ));
    }

    #[test]
    fn option_converts_none_to_undefined() {
        let bag: ValueBag = [("a", None), ("b", Some(json!(true)))]
            .into_iter()
            .collect();
        assert!(bag.get("a").is_some_and(ParamValue::is_undefined));
        assert_eq!(bag.get("b").and_then(ParamValue::as_value), Some(&json!(true)));
    }
}
