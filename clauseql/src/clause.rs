use crate::error::Error;
use crate::field::{Field, FieldRegistry};
use crate::operator::{operators_for, Operator};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::trace;

/// Connector relating a clause to the accumulated result of the clauses before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Join {
    #[default]
    And,
    Or,
}

impl Join {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Join::And => "AND",
            Join::Or => "OR",
        }
    }
}

/// A single field/operator/value predicate.
///
/// Values hold the literal text as entered; they are coerced to the field's type when the clause
/// is compiled. `value2` is only read by `between`. The join of the first clause in a list is
/// never consulted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clause {
    pub id: u32,
    pub join: Join,
    #[serde(rename = "fieldKey")]
    pub field: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub value2: String,
}

impl Clause {
    /// A clause with no id yet; [`ClauseSet::push`] assigns one.
    pub fn new(field: impl Into<String>, operator: Operator) -> Self {
        Self { id: 0, join: Join::And, field: field.into(), operator, value: String::new(), value2: String::new() }
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn between(mut self, low: impl Into<String>, high: impl Into<String>) -> Self {
        self.value = low.into();
        self.value2 = high.into();
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.join = join;
        self
    }

    pub fn or(self) -> Self { self.join(Join::Or) }

    fn default_for(id: u32, field: &Field) -> Self {
        Self {
            id,
            join: Join::And,
            field: field.key.clone(),
            operator: operators_for(field.field_type)[0],
            value: String::new(),
            value2: String::new(),
        }
    }
}

/// An ordered clause list plus the inversion flag: the state of one filter-builder session.
///
/// Serializes as `{inverted, clauses}`, the structural echo used for persistence and debugging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClauseSet {
    inverted: bool,
    clauses: Vec<Clause>,
    #[serde(skip)]
    next_id: u32,
}

impl ClauseSet {
    pub fn new() -> Self { Self { inverted: false, clauses: Vec::new(), next_id: 1 } }

    /// Build a set from clauses, assigning fresh ids in order
    pub fn with_clauses(clauses: impl IntoIterator<Item = Clause>) -> Self {
        let mut set = Self::new();
        for clause in clauses {
            set.push(clause);
        }
        set
    }

    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn clauses(&self) -> &[Clause] { &self.clauses }

    pub fn is_inverted(&self) -> bool { self.inverted }

    pub fn len(&self) -> usize { self.clauses.len() }

    pub fn is_empty(&self) -> bool { self.clauses.is_empty() }

    pub fn get(&self, id: u32) -> Option<&Clause> { self.clauses.iter().find(|c| c.id == id) }

    /// Append a clause, replacing its id with the next free one
    pub fn push(&mut self, mut clause: Clause) -> u32 {
        let id = self.allocate_id();
        clause.id = id;
        self.clauses.push(clause);
        id
    }

    /// Append a clause on the registry's first field with that field's first legal operator
    pub fn add_clause(&mut self, registry: &FieldRegistry) -> Result<u32, Error> {
        let field = registry.default_field().ok_or(Error::EmptyRegistry)?;
        let id = self.allocate_id();
        self.clauses.push(Clause::default_for(id, field));
        trace!("added clause {} on {}", id, field.key);
        Ok(id)
    }

    /// Make sure an active builder has at least one clause to edit
    pub fn ensure_clause(&mut self, registry: &FieldRegistry) -> Result<(), Error> {
        if self.clauses.is_empty() {
            self.add_clause(registry)?;
        }
        Ok(())
    }

    /// Remove a clause. Removing the last one recreates a default clause, so a live builder
    /// never holds an empty list; use [`ClauseSet::reset`] to discard the filter entirely.
    pub fn remove_clause(&mut self, id: u32, registry: &FieldRegistry) -> Result<(), Error> {
        let position = self.clauses.iter().position(|c| c.id == id).ok_or(Error::UnknownClause(id))?;
        self.clauses.remove(position);
        trace!("removed clause {}", id);
        self.ensure_clause(registry)
    }

    /// Point a clause at another field. The operator resets to the new field's default and both
    /// values are cleared, since they may not be meaningful for the new type.
    pub fn set_field(&mut self, id: u32, key: &str, registry: &FieldRegistry) -> Result<(), Error> {
        let field = registry.field(key).ok_or_else(|| Error::UnknownField(key.to_string()))?;
        let clause = self.clause_mut(id)?;
        *clause = Clause { join: clause.join, ..Clause::default_for(id, field) };
        trace!("clause {} now on {}", id, key);
        Ok(())
    }

    pub fn set_operator(&mut self, id: u32, operator: Operator, registry: &FieldRegistry) -> Result<(), Error> {
        let field_type = registry.field_type(&self.clause_mut(id)?.field)?;
        let clause = self.clause_mut(id)?;
        if !operator.is_legal_for(field_type) {
            return Err(Error::IllegalOperator { field: clause.field.clone(), operator, field_type });
        }
        clause.operator = operator;
        Ok(())
    }

    pub fn set_join(&mut self, id: u32, join: Join) -> Result<(), Error> {
        self.clause_mut(id)?.join = join;
        Ok(())
    }

    pub fn set_value(&mut self, id: u32, value: impl Into<String>) -> Result<(), Error> {
        self.clause_mut(id)?.value = value.into();
        Ok(())
    }

    pub fn set_value2(&mut self, id: u32, value: impl Into<String>) -> Result<(), Error> {
        self.clause_mut(id)?.value2 = value.into();
        Ok(())
    }

    pub fn set_inverted(&mut self, inverted: bool) { self.inverted = inverted; }

    /// Discard every clause and the inversion flag. The empty set is the identity filter.
    pub fn reset(&mut self) { *self = Self::new(); }

    pub fn to_json(&self) -> Result<String, Error> { Ok(serde_json::to_string(self)?) }

    pub fn to_json_pretty(&self) -> Result<String, Error> { Ok(serde_json::to_string_pretty(self)?) }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        let mut set: ClauseSet = serde_json::from_str(json)?;
        set.next_id = set.clauses.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        Ok(set)
    }

    /// Stable digest of everything that affects evaluation: the inversion flag and each clause's
    /// join, field, operator and values, in order. Clause ids are excluded. Suitable as a cache key
    /// for preview counts.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update([self.inverted as u8]);
        hasher.update((self.clauses.len() as u32).to_be_bytes());
        for clause in &self.clauses {
            hasher.update([match clause.join {
                Join::And => 0x01,
                Join::Or => 0x02,
            }]);
            write_str(&mut hasher, &clause.field);
            write_str(&mut hasher, clause.operator.key());
            write_str(&mut hasher, &clause.value);
            write_str(&mut hasher, &clause.value2);
        }
        format!("{:x}", hasher.finalize())
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    fn clause_mut(&mut self, id: u32) -> Result<&mut Clause, Error> {
        self.clauses.iter_mut().find(|c| c.id == id).ok_or(Error::UnknownClause(id))
    }
}

// length-prefixed so that adjacent strings cannot collide
fn write_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u32).to_be_bytes());
    hasher.update(s.as_bytes());
}
