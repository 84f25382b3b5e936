use crate::error::Error;
use crate::field::FieldType;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A typed record value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    String(String),
    Date(NaiveDate),
    Bool(bool),
    /// Structured value with indexed sub-values, e.g. a pollution parameter measured per phase
    Nested(Nested),
}

/// Sub-values addressed by key plus an optional summary used when no sub-key is requested.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Nested {
    pub summary: Option<Box<Value>>,
    pub parts: BTreeMap<String, Value>,
}

impl Nested {
    pub fn new() -> Self { Self::default() }

    pub fn with_summary(mut self, summary: impl Into<Value>) -> Self {
        self.summary = Some(Box::new(summary.into()));
        self
    }

    pub fn with_part(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parts.insert(key.into(), value.into());
        self
    }
}

impl Value {
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Value::Number(_) => Some(FieldType::Number),
            Value::String(_) => Some(FieldType::String),
            Value::Date(_) => Some(FieldType::Date),
            Value::Bool(_) => Some(FieldType::Boolean),
            Value::Nested(_) => None,
        }
    }

    /// Best-effort coercion of a record value to a field's declared type.
    /// Returns `None` when the value cannot represent the type; callers treat that as absent.
    /// Booleans are only ever produced from booleans.
    pub fn coerce_to(&self, target: FieldType) -> Option<Value> {
        if self.field_type() == Some(target) {
            return Some(self.clone());
        }
        match (self, target) {
            (Value::Nested(_), _) | (_, FieldType::Boolean) => None,
            (Value::String(s), FieldType::Number) => parse_number(s).map(Value::Number),
            (Value::String(s), FieldType::Date) => parse_date(s).map(Value::Date),
            (other, FieldType::String) => Some(Value::String(other.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Nested(nested) => match &nested.summary {
                Some(summary) => write!(f, "{summary}"),
                None => f.write_str("{...}"),
            },
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self { Value::Number(value) }
}
impl From<i64> for Value {
    fn from(value: i64) -> Self { Value::Number(value as f64) }
}
impl From<i32> for Value {
    fn from(value: i32) -> Self { Value::Number(value as f64) }
}
impl From<bool> for Value {
    fn from(value: bool) -> Self { Value::Bool(value) }
}
impl From<&str> for Value {
    fn from(value: &str) -> Self { Value::String(value.to_string()) }
}
impl From<String> for Value {
    fn from(value: String) -> Self { Value::String(value) }
}
impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self { Value::Date(value) }
}
impl From<Nested> for Value {
    fn from(value: Nested) -> Self { Value::Nested(value) }
}

/// Clause literal coercion. Clause values hold the text a user typed; this turns that text
/// into a typed value for the clause's field.
pub struct Literal;

impl Literal {
    pub fn parse(field: &str, text: &str, field_type: FieldType) -> Result<Value, Error> {
        let malformed = || Error::MalformedValue { field: field.to_string(), value: text.to_string(), expected: field_type };
        match field_type {
            FieldType::String => Ok(Value::String(text.to_string())),
            FieldType::Number => parse_number(text).map(Value::Number).ok_or_else(malformed),
            FieldType::Date => parse_date(text).map(Value::Date).ok_or_else(malformed),
            FieldType::Boolean => match text.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(malformed()),
            },
        }
    }
}

fn parse_number(text: &str) -> Option<f64> { text.trim().parse::<f64>().ok().filter(|n| n.is_finite()) }

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .or_else(|| chrono::DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}
