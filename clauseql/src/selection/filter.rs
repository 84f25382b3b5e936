//! Evaluate a clause set against records.
//!
//! A [`ClauseSet`] is first compiled into a [`Selection`]: every clause is checked against the
//! field registry and its literals are coerced to the field's type once. Structural problems
//! (unknown field, illegal operator) abort compilation for the whole set. Malformed literals do
//! not; such a clause simply never matches. Matching a compiled selection is infallible.
//!
//! Clauses combine strictly left to right: `acc = acc <join_i> result_i`. There is no AND-over-OR
//! precedence, so `A OR B AND C` means `(A OR B) AND C`.

use crate::clause::{Clause, ClauseSet, Join};
use crate::collation::{Collation, RangeBound};
use crate::config::{BetweenPolicy, FilterConfig};
use crate::error::Error;
use crate::field::{FieldRegistry, FieldType};
use crate::operator::Operator;
use crate::record::{resolve, Filterable, Resolved};
use crate::value::{Literal, Value};
use std::cmp::Ordering;
use tracing::debug;

#[derive(Debug, Clone)]
enum Test {
    /// A literal could not be coerced; the clause never matches
    Never,
    Eq(Value),
    Neq(Value),
    Range { lower: RangeBound<Value>, upper: RangeBound<Value> },
    Contains(String),
    StartsWith(String),
    EndsWith(String),
    IsEmpty,
    IsNotEmpty,
    IsTrue,
    IsFalse,
}

#[derive(Debug, Clone)]
struct CompiledClause {
    field: String,
    field_type: FieldType,
    join: Join,
    test: Test,
}

/// Outcome of one clause against one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Match,
    NoMatch,
    /// The record lacks a requested sub-value; the whole record fails
    FailClosed,
}

/// A validated, literal-coerced clause set ready to be matched against records
#[derive(Debug, Clone)]
pub struct Selection {
    clauses: Vec<CompiledClause>,
    inverted: bool,
    separator: char,
}

impl Selection {
    pub fn compile(registry: &FieldRegistry, set: &ClauseSet) -> Result<Self, Error> {
        Self::compile_with(registry, set, &FilterConfig::default())
    }

    pub fn compile_with(registry: &FieldRegistry, set: &ClauseSet, config: &FilterConfig) -> Result<Self, Error> {
        Self::compile_clauses(registry, set.clauses(), set.is_inverted(), config)
    }

    pub fn compile_clauses(registry: &FieldRegistry, clauses: &[Clause], inverted: bool, config: &FilterConfig) -> Result<Self, Error> {
        let clauses = clauses.iter().map(|clause| compile_clause(registry, clause, config)).collect::<Result<Vec<_>, _>>()?;
        debug!("compiled selection with {} clause(s), inverted={}", clauses.len(), inverted);
        Ok(Self { clauses, inverted, separator: config.path_separator })
    }

    pub fn len(&self) -> usize { self.clauses.len() }

    pub fn is_empty(&self) -> bool { self.clauses.is_empty() }

    /// Whether `record` passes the selection. An empty selection passes every record,
    /// inverted or not.
    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        let mut outcomes = self.clauses.iter().map(|clause| (clause.join, clause.evaluate(record, self.separator)));
        let Some((_, first)) = outcomes.next() else {
            return true;
        };

        let mut failed_closed = first == Outcome::FailClosed;
        let mut acc = first == Outcome::Match;
        for (join, outcome) in outcomes {
            failed_closed |= outcome == Outcome::FailClosed;
            let result = outcome == Outcome::Match;
            acc = match join {
                Join::And => acc && result,
                Join::Or => acc || result,
            };
        }
        if failed_closed {
            acc = false;
        }

        acc != self.inverted
    }
}

fn compile_clause(registry: &FieldRegistry, clause: &Clause, config: &FilterConfig) -> Result<CompiledClause, Error> {
    let field_type = registry.field_type(&clause.field)?;
    if !clause.operator.is_legal_for(field_type) {
        return Err(Error::IllegalOperator { field: clause.field.clone(), operator: clause.operator, field_type });
    }

    let test = match build_test(clause, field_type, config) {
        Ok(test) => test,
        Err(e) => {
            debug!("clause {} never matches: {}", clause.id, e);
            Test::Never
        }
    };
    Ok(CompiledClause { field: clause.field.clone(), field_type, join: clause.join, test })
}

fn build_test(clause: &Clause, field_type: FieldType, config: &FilterConfig) -> Result<Test, Error> {
    let literal = |text: &str| Literal::parse(&clause.field, text, field_type);
    let lowered = || clause.value.to_lowercase();
    Ok(match clause.operator {
        Operator::Eq => Test::Eq(literal(&clause.value)?),
        Operator::Neq => Test::Neq(literal(&clause.value)?),
        Operator::Gt => Test::Range { lower: RangeBound::Excluded(literal(&clause.value)?), upper: RangeBound::Unbounded },
        Operator::Gte => Test::Range { lower: RangeBound::Included(literal(&clause.value)?), upper: RangeBound::Unbounded },
        Operator::Lt => Test::Range { lower: RangeBound::Unbounded, upper: RangeBound::Excluded(literal(&clause.value)?) },
        Operator::Lte => Test::Range { lower: RangeBound::Unbounded, upper: RangeBound::Included(literal(&clause.value)?) },
        Operator::Between => {
            let mut low = literal(&clause.value)?;
            let mut high = literal(&clause.value2)?;
            if config.between == BetweenPolicy::Swap && high.compare(&low) == Some(Ordering::Less) {
                std::mem::swap(&mut low, &mut high);
            }
            Test::Range { lower: RangeBound::Included(low), upper: RangeBound::Included(high) }
        }
        Operator::Contains => Test::Contains(lowered()),
        Operator::StartsWith => Test::StartsWith(lowered()),
        Operator::EndsWith => Test::EndsWith(lowered()),
        Operator::IsEmpty => Test::IsEmpty,
        Operator::IsNotEmpty => Test::IsNotEmpty,
        Operator::IsTrue => Test::IsTrue,
        Operator::IsFalse => Test::IsFalse,
    })
}

impl CompiledClause {
    fn evaluate<R: Filterable + ?Sized>(&self, record: &R, separator: char) -> Outcome {
        let value = match resolve(record, &self.field, self.field_type, separator) {
            Resolved::MissingSubKey => return Outcome::FailClosed,
            Resolved::Absent => None,
            Resolved::Present(value) => Some(value),
        };
        if self.test(value.as_ref()) {
            Outcome::Match
        } else {
            Outcome::NoMatch
        }
    }

    fn test(&self, value: Option<&Value>) -> bool {
        match (&self.test, value) {
            (Test::Never, _) => false,
            (Test::IsEmpty, None) => true,
            (Test::IsEmpty, Some(value)) => value.as_str() == Some(""),
            (Test::IsNotEmpty, None) => false,
            (Test::IsNotEmpty, Some(value)) => value.as_str() != Some(""),
            (Test::IsTrue, value) => value == Some(&Value::Bool(true)),
            (Test::IsFalse, value) => value == Some(&Value::Bool(false)),
            // inequality against nothing holds, every other comparison needs a value
            (Test::Neq(_), None) => true,
            (_, None) => false,
            (Test::Eq(target), Some(value)) => value.compare(target) == Some(Ordering::Equal),
            (Test::Neq(target), Some(value)) => value.compare(target) != Some(Ordering::Equal),
            (Test::Range { lower, upper }, Some(value)) => value.is_in_range(lower.as_ref(), upper.as_ref()),
            (Test::Contains(needle), Some(value)) => value.to_string().to_lowercase().contains(needle.as_str()),
            (Test::StartsWith(prefix), Some(value)) => value.to_string().to_lowercase().starts_with(prefix.as_str()),
            (Test::EndsWith(suffix), Some(value)) => value.to_string().to_lowercase().ends_with(suffix.as_str()),
        }
    }
}

/// Compile and evaluate in one step
pub fn evaluate<R: Filterable + ?Sized>(record: &R, registry: &FieldRegistry, set: &ClauseSet) -> Result<bool, Error> {
    Ok(Selection::compile(registry, set)?.matches(record))
}

/// Evaluate a bare clause list with an inversion flag
pub fn matches<R: Filterable + ?Sized>(record: &R, registry: &FieldRegistry, clauses: &[Clause], inverted: bool) -> Result<bool, Error> {
    Ok(Selection::compile_clauses(registry, clauses, inverted, &FilterConfig::default())?.matches(record))
}

#[derive(Debug, PartialEq)]
pub enum FilterResult<R> {
    Pass(R),
    Skip(R),
}

pub struct FilterIterator<'a, I> {
    iter: I,
    selection: &'a Selection,
}

impl<'a, I, R> FilterIterator<'a, I>
where
    I: Iterator<Item = R>,
    R: Filterable,
{
    pub fn new(iter: I, selection: &'a Selection) -> Self { Self { iter, selection } }
}

impl<I, R> Iterator for FilterIterator<'_, I>
where
    I: Iterator<Item = R>,
    R: Filterable,
{
    type Item = FilterResult<R>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|record| if self.selection.matches(&record) { FilterResult::Pass(record) } else { FilterResult::Skip(record) })
    }
}
