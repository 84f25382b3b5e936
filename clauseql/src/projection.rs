//! Apply a selection across a record collection.

use crate::clause::ClauseSet;
use crate::config::FilterConfig;
use crate::error::Error;
use crate::field::FieldRegistry;
use crate::record::Filterable;
use crate::selection::filter::{FilterIterator, FilterResult, Selection};
use tracing::debug;

/// The records that passed a selection, borrowed from the input collection in input order
#[derive(Debug)]
pub struct Projection<'a, R> {
    pub matching: Vec<&'a R>,
    pub count: usize,
}

impl<'a, R> Projection<'a, R> {
    pub fn is_empty(&self) -> bool { self.count == 0 }

    pub fn iter(&self) -> impl Iterator<Item = &'a R> + '_ { self.matching.iter().copied() }
}

pub fn project<'a, R: Filterable>(records: &'a [R], selection: &Selection) -> Projection<'a, R> {
    let matching: Vec<&R> = FilterIterator::new(records.iter(), selection)
        .filter_map(|result| match result {
            FilterResult::Pass(record) => Some(record),
            FilterResult::Skip(_) => None,
        })
        .collect();
    let count = matching.len();
    debug!("projected {} of {} record(s)", count, records.len());
    Projection { matching, count }
}

/// Count the records passing a selection without collecting them
pub fn match_count<R: Filterable>(records: &[R], selection: &Selection) -> usize {
    if selection.is_empty() {
        return records.len();
    }
    records.iter().filter(|record| selection.matches(*record)).count()
}

/// Stateless preview of a clause set under edit. Every call recompiles, so it is safe to invoke
/// after each keystroke; callers wanting to cache can key on [`ClauseSet::fingerprint`].
pub struct Preview<'a> {
    registry: &'a FieldRegistry,
    config: FilterConfig,
}

impl<'a> Preview<'a> {
    pub fn new(registry: &'a FieldRegistry) -> Self { Self { registry, config: FilterConfig::default() } }

    pub fn with_config(registry: &'a FieldRegistry, config: FilterConfig) -> Self { Self { registry, config } }

    pub fn count<R: Filterable>(&self, records: &[R], set: &ClauseSet) -> Result<usize, Error> {
        let selection = Selection::compile_with(self.registry, set, &self.config)?;
        Ok(match_count(records, &selection))
    }

    /// Commit the clause set: compile once and materialize the matching records
    pub fn apply<'r, R: Filterable>(&self, records: &'r [R], set: &ClauseSet) -> Result<Projection<'r, R>, Error> {
        let selection = Selection::compile_with(self.registry, set, &self.config)?;
        Ok(project(records, &selection))
    }
}
