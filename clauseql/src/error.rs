use crate::field::FieldType;
use crate::grammar;
use crate::operator::Operator;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A clause names a field key that the registry does not declare
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("operator {operator} is not legal for {field_type} field {field}")]
    IllegalOperator { field: String, operator: Operator, field_type: FieldType },
    #[error("unknown clause id: {0}")]
    UnknownClause(u32),
    #[error("field registry is empty")]
    EmptyRegistry,
    #[error("duplicate field key in registry: {0}")]
    DuplicateField(String),
    /// A literal that cannot be coerced to the field's type. Evaluation absorbs this
    /// (the clause never matches); it only surfaces from `Literal::parse`.
    #[error("malformed {expected} literal for field {field}: {value:?}")]
    MalformedValue { field: String, value: String, expected: FieldType },
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from parsing rendered query text back into clauses
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Syntax error: {0}")]
    SyntaxError(String),
    #[error("Expected {expected}, got {got:?}")]
    UnexpectedRule { expected: &'static str, got: grammar::Rule },
    #[error("Missing {0} operand")]
    MissingOperand(&'static str),
    #[error("Invalid clause: {0}")]
    InvalidClause(String),
}

impl From<pest::error::Error<grammar::Rule>> for ParseError {
    fn from(error: pest::error::Error<grammar::Rule>) -> Self { ParseError::SyntaxError(error.to_string()) }
}

impl From<pest::error::Error<grammar::Rule>> for Error {
    fn from(error: pest::error::Error<grammar::Rule>) -> Self { Error::Parse(error.into()) }
}
