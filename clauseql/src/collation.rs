use crate::value::Value;
use std::cmp::Ordering;

/// Represents a bound in a range comparison
#[derive(Debug, Clone, PartialEq)]
pub enum RangeBound<T> {
    Included(T),
    Excluded(T),
    Unbounded,
}

impl<T> RangeBound<T> {
    pub fn as_ref(&self) -> RangeBound<&T> {
        match self {
            RangeBound::Included(value) => RangeBound::Included(value),
            RangeBound::Excluded(value) => RangeBound::Excluded(value),
            RangeBound::Unbounded => RangeBound::Unbounded,
        }
    }
}

/// Trait for values that can be ordered against each other
pub trait Collation {
    /// Compare two values in the collation order. `None` when they are not comparable.
    fn compare(&self, other: &Self) -> Option<Ordering>;

    /// Returns true if this value is within the given range. Incomparable bounds never contain a value.
    fn is_in_range(&self, lower: RangeBound<&Self>, upper: RangeBound<&Self>) -> bool {
        let above = match lower {
            RangeBound::Unbounded => true,
            RangeBound::Included(lower) => matches!(self.compare(lower), Some(Ordering::Greater | Ordering::Equal)),
            RangeBound::Excluded(lower) => self.compare(lower) == Some(Ordering::Greater),
        };
        let below = match upper {
            RangeBound::Unbounded => true,
            RangeBound::Included(upper) => matches!(self.compare(upper), Some(Ordering::Less | Ordering::Equal)),
            RangeBound::Excluded(upper) => self.compare(upper) == Some(Ordering::Less),
        };
        above && below
    }
}

impl Collation for Value {
    fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}
