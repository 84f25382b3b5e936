//! Parse rendered query text back into a clause set.
//!
//! Accepts exactly the forms produced by [`crate::selection::sql::generate_selection_sql`]. Some
//! renderings are shared by more than one clause: `= ''` and `!= ''` come back as `is_empty` /
//! `is_not_empty`, and a `LIKE` pattern without wildcards comes back as `eq`. A `NULL` literal
//! is a missing value.

use crate::clause::{Clause, ClauseSet, Join};
use crate::error::{Error, ParseError};
use crate::field::FieldRegistry;
use crate::grammar::{self, ClauseqlParser, Rule};
use crate::operator::Operator;
use pest::iterators::Pair;
use pest::Parser;

/// Parse a query expression into a clause set, checking fields and operators against the registry.
pub fn parse_query(registry: &FieldRegistry, input: &str) -> Result<ClauseSet, Error> {
    let mut pairs = ClauseqlParser::parse(Rule::Query, input.trim())?;
    let root = pairs.next().ok_or(ParseError::MissingOperand("query"))?;

    let (inverted, list) = match root.as_rule() {
        Rule::NoFilter => return Ok(ClauseSet::new()),
        Rule::Where => (false, single_inner(root, "clause list")?),
        Rule::Inverted => (true, single_inner(root, "clause list")?),
        got => return Err(ParseError::UnexpectedRule { expected: "Where, Inverted or NoFilter", got }.into()),
    };

    let mut set = ClauseSet::new().inverted(inverted);
    let mut join = Join::And;
    for pair in list.into_inner() {
        match pair.as_rule() {
            Rule::Join => join = parse_join(pair)?,
            Rule::Clause => {
                set.push(parse_clause(registry, pair)?.join(join));
                join = Join::And;
            }
            got => return Err(ParseError::UnexpectedRule { expected: "Clause or Join", got }.into()),
        }
    }
    Ok(set)
}

fn single_inner<'a>(pair: Pair<'a, Rule>, what: &'static str) -> Result<Pair<'a, Rule>, ParseError> {
    pair.into_inner().next().ok_or(ParseError::MissingOperand(what))
}

fn parse_join(pair: Pair<Rule>) -> Result<Join, ParseError> {
    match single_inner(pair, "join")?.as_rule() {
        Rule::And => Ok(Join::And),
        Rule::Or => Ok(Join::Or),
        got => Err(ParseError::UnexpectedRule { expected: "And or Or", got }),
    }
}

fn parse_clause(registry: &FieldRegistry, pair: Pair<Rule>) -> Result<Clause, Error> {
    let mut inner = pair.into_inner();
    let field = inner.next().ok_or(ParseError::MissingOperand("field"))?;
    let predicate = inner.next().ok_or(ParseError::MissingOperand("predicate"))?;

    let key = field.as_str();
    let field_type = registry.field_type(key)?;

    let clause = match predicate.as_rule() {
        Rule::Between => {
            let mut bounds = predicate.into_inner();
            let low = literal_text(bounds.next().ok_or(ParseError::MissingOperand("lower bound"))?);
            let high = literal_text(bounds.next().ok_or(ParseError::MissingOperand("upper bound"))?);
            Clause::new(key, Operator::Between).between(low, high)
        }
        Rule::Like => {
            let mut inner = predicate.into_inner();
            let pattern = literal_text(inner.next().ok_or(ParseError::MissingOperand("pattern"))?);
            let escape = inner.next().map(|escape| escape_char(key, escape)).transpose()?;
            pattern_clause(key, &pattern, escape)?
        }
        Rule::Comparison => comparison_clause(key, predicate)?,
        got => return Err(ParseError::UnexpectedRule { expected: "Between, Like or Comparison", got }.into()),
    };

    if !clause.operator.is_legal_for(field_type) {
        return Err(Error::IllegalOperator { field: key.to_string(), operator: clause.operator, field_type });
    }
    Ok(clause)
}

fn comparison_clause(key: &str, pair: Pair<Rule>) -> Result<Clause, ParseError> {
    let mut inner = pair.into_inner();
    let op = single_inner(inner.next().ok_or(ParseError::MissingOperand("operator"))?, "operator")?;
    let right = inner.next().ok_or(ParseError::MissingOperand("right"))?;

    let operator = match op.as_rule() {
        Rule::Eq => Operator::Eq,
        Rule::NotEq => Operator::Neq,
        Rule::Gt => Operator::Gt,
        Rule::Gte => Operator::Gte,
        Rule::Lt => Operator::Lt,
        Rule::Lte => Operator::Lte,
        got => return Err(ParseError::UnexpectedRule { expected: "comparison operator", got }),
    };

    if right.as_rule() == Rule::BoolKeyword {
        return match (operator, right.as_str()) {
            (Operator::Eq, "TRUE") => Ok(Clause::new(key, Operator::IsTrue)),
            (Operator::Eq, "FALSE") => Ok(Clause::new(key, Operator::IsFalse)),
            (_, keyword) => Err(ParseError::InvalidClause(format!("{key} {operator} {keyword}"))),
        };
    }

    let quoted = right.as_rule() == Rule::Quoted;
    let value = literal_text(right);
    Ok(match operator {
        Operator::Eq if quoted && value.is_empty() => Clause::new(key, Operator::IsEmpty),
        Operator::Neq if quoted && value.is_empty() => Clause::new(key, Operator::IsNotEmpty),
        operator => Clause::new(key, operator).value(value),
    })
}

fn escape_char(key: &str, pair: Pair<Rule>) -> Result<char, ParseError> {
    let text = literal_text(single_inner(pair, "escape")?);
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ParseError::InvalidClause(format!("{key} LIKE ... ESCAPE '{text}'"))),
    }
}

/// Map a LIKE pattern to the string operator whose rendering places the wildcards the same way.
/// Only a leading and a trailing `%` are understood; any other unescaped wildcard is rejected.
fn pattern_clause(key: &str, pattern: &str, escape: Option<char>) -> Result<Clause, ParseError> {
    let invalid = || ParseError::InvalidClause(format!("{key} LIKE '{pattern}'"));

    // (character, is a wildcard)
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if Some(c) == escape {
            tokens.push((chars.next().ok_or_else(invalid)?, false));
        } else {
            tokens.push((c, matches!(c, '%' | '_')));
        }
    }

    let leading = tokens.first() == Some(&('%', true));
    let trailing = tokens.len() > 1 && tokens.last() == Some(&('%', true));
    let inner = &tokens[usize::from(leading)..tokens.len() - usize::from(trailing)];
    if inner.iter().any(|(_, wildcard)| *wildcard) {
        return Err(invalid());
    }
    let value: String = inner.iter().map(|(c, _)| c).collect();

    Ok(match (leading, trailing) {
        (true, true) => Clause::new(key, Operator::Contains).value(value),
        (true, false) if tokens.len() == 1 => Clause::new(key, Operator::Contains),
        (true, false) => Clause::new(key, Operator::EndsWith).value(value),
        (false, true) => Clause::new(key, Operator::StartsWith).value(value),
        (false, false) => Clause::new(key, Operator::Eq).value(value),
    })
}

/// The text of a literal pair, with quotes removed and doubled quotes collapsed
fn literal_text(pair: Pair<grammar::Rule>) -> String {
    match pair.as_rule() {
        Rule::Quoted => pair.into_inner().next().map(|inner| inner.as_str().replace("''", "'")).unwrap_or_default(),
        Rule::NullKeyword => String::new(),
        _ => pair.as_str().to_string(),
    }
}
