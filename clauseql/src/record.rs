//! Typed access to record fields. Records are opaque to the evaluator; all it needs is a way
//! to look up a value by name, which is what [`Filterable`] provides.

use crate::field::FieldType;
use crate::value::{Nested, Value};
use std::collections::{BTreeMap, HashMap};

pub trait Filterable {
    fn value(&self, name: &str) -> Option<Value>;
}

impl<T: Filterable + ?Sized> Filterable for &T {
    fn value(&self, name: &str) -> Option<Value> { (**self).value(name) }
}

impl Filterable for HashMap<String, Value> {
    fn value(&self, name: &str) -> Option<Value> { self.get(name).cloned() }
}

impl Filterable for BTreeMap<String, Value> {
    fn value(&self, name: &str) -> Option<Value> { self.get(name).cloned() }
}

impl Filterable for serde_json::Map<String, serde_json::Value> {
    fn value(&self, name: &str) -> Option<Value> { self.get(name).and_then(json_to_value) }
}

/// Convert a JSON value into a record value. `null` and arrays have no representation and read as absent.
/// Objects become [`Nested`]: a `max` member is the summary and a `phases` object holds the parts;
/// any other object uses its members as parts.
pub fn json_to_value(json: &serde_json::Value) -> Option<Value> {
    match json {
        serde_json::Value::Null | serde_json::Value::Array(_) => None,
        serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
        serde_json::Value::Number(n) => n.as_f64().map(Value::Number),
        serde_json::Value::String(s) => Some(Value::String(s.clone())),
        serde_json::Value::Object(map) => {
            let mut nested = Nested::new();
            if map.contains_key("max") || map.contains_key("phases") {
                nested.summary = map.get("max").and_then(json_to_value).map(Box::new);
                if let Some(serde_json::Value::Object(phases)) = map.get("phases") {
                    nested.parts = phases.iter().filter_map(|(k, v)| json_to_value(v).map(|v| (k.clone(), v))).collect();
                }
            } else {
                nested.parts = map.iter().filter_map(|(k, v)| json_to_value(v).map(|v| (k.clone(), v))).collect();
            }
            Some(Value::Nested(nested))
        }
    }
}

/// Outcome of looking up a clause's field on a record
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Present(Value),
    /// No value, a null, or a value that cannot be coerced to the field's type
    Absent,
    /// The key addressed a sub-value (e.g. `BOD_P3`) that the record does not carry,
    /// either because the base has no such part or because the base is missing
    MissingSubKey,
}

/// Resolve `key` on `record` as a value of `field_type`.
///
/// The key is first looked up verbatim. When that misses and the key contains `separator`,
/// it is split at the first separator into a base name and a sub-key, and the sub-key is
/// read from the base's [`Nested`] value. A nested value addressed without a sub-key
/// resolves to its summary. A sub-key the record cannot supply, because the sub-value or the
/// whole base is missing, resolves to [`Resolved::MissingSubKey`].
pub fn resolve<R: Filterable + ?Sized>(record: &R, key: &str, field_type: FieldType, separator: char) -> Resolved {
    if let Some(value) = record.value(key) {
        return match value {
            Value::Nested(nested) => coerce(nested.summary.as_deref(), field_type),
            scalar => coerce(Some(&scalar), field_type),
        };
    }

    match key.split_once(separator) {
        Some((base, sub_key)) if !base.is_empty() && !sub_key.is_empty() => match record.value(base) {
            Some(Value::Nested(nested)) => match nested.parts.get(sub_key) {
                Some(part) => coerce(Some(part), field_type),
                None => Resolved::MissingSubKey,
            },
            Some(_) | None => Resolved::MissingSubKey,
        },
        _ => Resolved::Absent,
    }
}

fn coerce(value: Option<&Value>, field_type: FieldType) -> Resolved {
    match value.and_then(|v| v.coerce_to(field_type)) {
        Some(v) => Resolved::Present(v),
        None => Resolved::Absent,
    }
}
