use crate::field::FieldType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,         // =
    Neq,        // !=
    Gt,         // >
    Gte,        // >=
    Lt,         // <
    Lte,        // <=
    Between,    // BETWEEN a AND b
    Contains,   // LIKE '%a%'
    StartsWith, // LIKE 'a%'
    EndsWith,   // LIKE '%a'
    IsEmpty,
    IsNotEmpty,
    IsTrue,
    IsFalse,
}

/// Number of literal values an operator consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Zero,
    One,
    Two,
}

const ORDERED: &[Operator] =
    &[Operator::Eq, Operator::Neq, Operator::Gt, Operator::Gte, Operator::Lt, Operator::Lte, Operator::Between];
const STRING: &[Operator] = &[
    Operator::Eq,
    Operator::Neq,
    Operator::Contains,
    Operator::StartsWith,
    Operator::EndsWith,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];
const BOOLEAN: &[Operator] = &[Operator::IsTrue, Operator::IsFalse];

/// The legal operators for a field type, in catalog order. The first entry is the default.
pub fn operators_for(field_type: FieldType) -> &'static [Operator] {
    match field_type {
        FieldType::Number | FieldType::Date => ORDERED,
        FieldType::String => STRING,
        FieldType::Boolean => BOOLEAN,
    }
}

impl Operator {
    pub const ALL: [Operator; 14] = [
        Operator::Eq,
        Operator::Neq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Between,
        Operator::Contains,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::IsEmpty,
        Operator::IsNotEmpty,
        Operator::IsTrue,
        Operator::IsFalse,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Between => "between",
            Operator::Contains => "contains",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::IsEmpty => "is_empty",
            Operator::IsNotEmpty => "is_not_empty",
            Operator::IsTrue => "is_true",
            Operator::IsFalse => "is_false",
        }
    }

    /// Display label as shown in the operator picker for a field of the given type
    pub fn label(&self, field_type: FieldType) -> &'static str {
        match (self, field_type) {
            (Operator::Eq, FieldType::String) => "equals",
            (Operator::Neq, FieldType::String) => "not equals",
            (Operator::Eq, _) => "=",
            (Operator::Neq, _) => "!=",
            (Operator::Gt, _) => ">",
            (Operator::Gte, _) => ">=",
            (Operator::Lt, _) => "<",
            (Operator::Lte, _) => "<=",
            (Operator::Between, _) => "between",
            (Operator::Contains, _) => "contains",
            (Operator::StartsWith, _) => "starts with",
            (Operator::EndsWith, _) => "ends with",
            (Operator::IsEmpty, _) => "is empty",
            (Operator::IsNotEmpty, _) => "is not empty",
            (Operator::IsTrue, _) => "is true",
            (Operator::IsFalse, _) => "is false",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Operator::IsEmpty | Operator::IsNotEmpty | Operator::IsTrue | Operator::IsFalse => Arity::Zero,
            Operator::Between => Arity::Two,
            _ => Arity::One,
        }
    }

    /// Emptiness checks are accepted on any field type and equality on booleans as well;
    /// everything else must appear in the catalog for the type.
    pub fn is_legal_for(&self, field_type: FieldType) -> bool {
        match self {
            Operator::IsEmpty | Operator::IsNotEmpty => true,
            Operator::Eq | Operator::Neq if field_type == FieldType::Boolean => true,
            _ => operators_for(field_type).contains(self),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.key()) }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operator: {0}")]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL.iter().find(|op| op.key() == s).copied().ok_or_else(|| UnknownOperator(s.to_string()))
    }
}
