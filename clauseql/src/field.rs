use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The semantic type of a field. Determines the legal operators and how literals are coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Number,
    String,
    Date,
    Boolean,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Number => "number",
            FieldType::String => "string",
            FieldType::Date => "date",
            FieldType::Boolean => "boolean",
        }
    }

    /// Whether rendered literals of this type are quoted
    pub fn is_quoted(&self) -> bool { matches!(self, FieldType::String | FieldType::Date) }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl Field {
    pub fn new(key: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self { key: key.into(), label: label.into(), field_type }
    }
}

/// Static, ordered declaration of the fields a clause may reference.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
}

impl FieldRegistry {
    pub fn new(fields: Vec<Field>) -> Result<Self, Error> {
        let mut index = HashMap::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            if index.insert(field.key.clone(), i).is_some() {
                return Err(Error::DuplicateField(field.key.clone()));
            }
        }
        Ok(Self { fields, index })
    }

    /// Load a registry declared as a JSON array of `{key, label, type}` objects
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let fields: Vec<Field> = serde_json::from_str(json)?;
        Self::new(fields)
    }

    pub fn field(&self, key: &str) -> Option<&Field> { self.index.get(key).map(|i| &self.fields[*i]) }

    pub fn field_type(&self, key: &str) -> Result<FieldType, Error> {
        self.field(key).map(|f| f.field_type).ok_or_else(|| Error::UnknownField(key.to_string()))
    }

    /// The field new clauses start with. `None` only for an empty registry.
    pub fn default_field(&self) -> Option<&Field> { self.fields.first() }

    pub fn iter(&self) -> impl Iterator<Item = &Field> { self.fields.iter() }

    pub fn len(&self) -> usize { self.fields.len() }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    /// Fields of the employee table used by the tabular query builder
    pub fn employees() -> Self {
        Self::from_static(vec![
            Field::new("id", "ID", FieldType::Number),
            Field::new("name", "Name", FieldType::String),
            Field::new("age", "Age", FieldType::Number),
            Field::new("department", "Department", FieldType::String),
            Field::new("hired", "Hired Date", FieldType::Date),
            Field::new("active", "Active", FieldType::Boolean),
        ])
    }

    /// Fields of the treatment-plant dataset. Pollution parameters are declared once as a
    /// general (max) field and once per phase, e.g. `BOD`, `BOD_P1`, `BOD_P2`, `BOD_P3`.
    pub fn treatment_plants() -> Self {
        let mut fields = vec![
            Field::new("capacity", "Design Capacity", FieldType::Number),
            Field::new("opCapacity", "Operational Capacity", FieldType::Number),
            Field::new("opPercent", "Operational %", FieldType::Number),
            Field::new("totalScore", "Total Score", FieldType::Number),
        ];
        for (param, label) in [
            ("BOD", "BOD"),
            ("COD", "COD"),
            ("TSS", "TSS"),
            ("TP", "Total Phosphorus"),
            ("TN", "Total Nitrogen"),
            ("FC", "Fecal Coliform"),
        ] {
            fields.push(Field::new(param, format!("{label} (Max)"), FieldType::Number));
            for phase in 1..=3 {
                fields.push(Field::new(format!("{param}_P{phase}"), format!("{param} - Phase {phase}"), FieldType::Number));
            }
        }
        Self::from_static(fields)
    }

    // stock registries are built from literal keys that are unique
    fn from_static(fields: Vec<Field>) -> Self {
        let index = fields.iter().enumerate().map(|(i, f)| (f.key.clone(), i)).collect();
        Self { fields, index }
    }
}
