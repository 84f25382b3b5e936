//! Clause-based record filtering.
//!
//! A filter is an ordered list of [`Clause`]s (field, operator, literal values, join connector)
//! plus an inversion flag, held in a [`ClauseSet`]. Fields are declared in a [`FieldRegistry`]
//! with a semantic type that decides which [`Operator`]s apply and how literals are coerced.
//!
//! ```
//! use clauseql::{Clause, ClauseSet, FieldRegistry, Operator, Preview};
//! use clauseql::selection::sql::generate_selection_sql;
//!
//! let registry = FieldRegistry::employees();
//! let set = ClauseSet::with_clauses([
//!     Clause::new("age", Operator::Gt).value("30"),
//!     Clause::new("active", Operator::IsTrue).or(),
//! ]);
//! assert_eq!(generate_selection_sql(&registry, &set).unwrap(), "WHERE (age > 30) OR (active = TRUE)");
//!
//! let records: Vec<serde_json::Map<String, serde_json::Value>> = Vec::new();
//! assert_eq!(Preview::new(&registry).count(&records, &set).unwrap(), 0);
//! ```

pub mod clause;
pub mod collation;
pub mod config;
pub mod error;
pub mod field;
pub mod grammar;
pub mod operator;
pub mod parser;
pub mod projection;
pub mod record;
pub mod selection;
pub mod value;

pub use clause::{Clause, ClauseSet, Join};
pub use config::{BetweenPolicy, FilterConfig};
pub use error::{Error, ParseError};
pub use field::{Field, FieldRegistry, FieldType};
pub use operator::{operators_for, Arity, Operator};
pub use parser::parse_query;
pub use projection::{match_count, project, Preview, Projection};
pub use record::{Filterable, Resolved};
pub use selection::filter::{evaluate, matches, Selection};
pub use value::{Literal, Nested, Value};
