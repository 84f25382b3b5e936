use crate::clause::{Clause, ClauseSet};
use crate::error::Error;
use crate::field::{FieldRegistry, FieldType};
use crate::operator::Operator;
use crate::value::Literal;

/// Text rendered for an empty clause list
pub const NO_FILTER: &str = "No filter";

/// Escape character for LIKE patterns whose value contains a wildcard
pub const LIKE_ESCAPE: char = '\\';

/// Stand-in for a missing literal on a non-string field; never equal to anything
pub const NULL_LITERAL: &str = "NULL";

// Numbers and booleans go out bare only when the text reads back as that type. Anything else is
// quoted so the clause keeps its text and still parses.
fn push_literal(field: &str, value: &str, field_type: FieldType, buffer: &mut String) {
    let trimmed = value.trim();
    match field_type {
        FieldType::String => push_quoted(value, buffer),
        _ if trimmed.is_empty() => buffer.push_str(NULL_LITERAL),
        FieldType::Date => push_quoted(value, buffer),
        FieldType::Number if Literal::parse(field, trimmed, field_type).is_ok() => buffer.push_str(trimmed),
        FieldType::Boolean if Literal::parse(field, trimmed, field_type).is_ok() => buffer.push_str(&trimmed.to_ascii_lowercase()),
        FieldType::Number | FieldType::Boolean => push_quoted(value, buffer),
    }
}

fn push_quoted(value: &str, buffer: &mut String) {
    buffer.push('\'');
    for c in value.chars() {
        match c {
            '\'' => buffer.push_str("''"),
            // NUL bytes truncate strings in C-based drivers
            '\0' => continue,
            _ => buffer.push(c),
        }
    }
    buffer.push('\'');
}

fn push_pattern(value: &str, leading: bool, trailing: bool, buffer: &mut String) {
    let escape = value.contains(['%', '_']);
    let mut pattern = String::with_capacity(value.len() + 2);
    if leading {
        pattern.push('%');
    }
    for c in value.chars() {
        if escape && matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    if trailing {
        pattern.push('%');
    }
    push_quoted(&pattern, buffer);
    if escape {
        buffer.push_str(" ESCAPE ");
        push_quoted(&LIKE_ESCAPE.to_string(), buffer);
    }
}

fn comparison_op_to_sql(op: Operator) -> Option<&'static str> {
    Some(match op {
        Operator::Eq => "=",
        Operator::Neq => "!=",
        Operator::Gt => ">",
        Operator::Gte => ">=",
        Operator::Lt => "<",
        Operator::Lte => "<=",
        _ => return None,
    })
}

fn generate_clause_sql(clause: &Clause, field_type: FieldType, buffer: &mut String) {
    buffer.push('(');
    buffer.push_str(&clause.field);
    match clause.operator {
        Operator::Between => {
            buffer.push_str(" BETWEEN ");
            push_literal(&clause.field, &clause.value, field_type, buffer);
            buffer.push_str(" AND ");
            push_literal(&clause.field, &clause.value2, field_type, buffer);
        }
        Operator::Contains | Operator::StartsWith | Operator::EndsWith => {
            buffer.push_str(" LIKE ");
            let leading = clause.operator != Operator::StartsWith;
            let trailing = clause.operator != Operator::EndsWith;
            push_pattern(&clause.value, leading, trailing, buffer);
        }
        Operator::IsEmpty => buffer.push_str(" = ''"),
        Operator::IsNotEmpty => buffer.push_str(" != ''"),
        Operator::IsTrue => buffer.push_str(" = TRUE"),
        Operator::IsFalse => buffer.push_str(" = FALSE"),
        op => {
            if let Some(sql) = comparison_op_to_sql(op) {
                buffer.push(' ');
                buffer.push_str(sql);
                buffer.push(' ');
                push_literal(&clause.field, &clause.value, field_type, buffer);
            }
        }
    }
    buffer.push(')');
}

/// Render a clause set as a query expression, e.g. `WHERE (age > 30) OR (active = TRUE)`.
///
/// Clauses are emitted in order with their own join connector; the first clause's join is
/// omitted. The text reads left to right the same way the evaluator folds, so no grouping
/// parentheses are added between clauses. An inverted set renders as `NOT ( ... )` and an empty
/// set as [`NO_FILTER`]. String and date literals are quoted, numbers and booleans are not.
pub fn generate_selection_sql(registry: &FieldRegistry, set: &ClauseSet) -> Result<String, Error> {
    if set.is_empty() {
        return Ok(NO_FILTER.to_string());
    }

    let mut body = String::new();
    for (i, clause) in set.clauses().iter().enumerate() {
        let field_type = registry.field_type(&clause.field)?;
        if i > 0 {
            body.push(' ');
            body.push_str(clause.join.as_sql());
            body.push(' ');
        }
        generate_clause_sql(clause, field_type, &mut body);
    }

    Ok(if set.is_inverted() { format!("NOT ( {body} )") } else { format!("WHERE {body}") })
}
