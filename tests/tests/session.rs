//! Editing a clause set the way the builder UI drives it, checking the live preview after each step

mod common;

use anyhow::Result;
use clauseql::selection::sql::generate_selection_sql;
use clauseql::{parse_query, ClauseSet, Error, FieldRegistry, Join, Operator, Preview};
use clauseql_tests::{employees, labels};

#[test]
fn build_filter_step_by_step() -> Result<()> {
    let registry = FieldRegistry::employees();
    let rows = employees();
    let preview = Preview::new(&registry);

    let mut set = ClauseSet::new();
    assert_eq!(preview.count(&rows, &set)?, 10);

    // the default clause sits on the first field with its first operator and no value yet
    set.ensure_clause(&registry)?;
    let first = set.clauses()[0].id;
    assert_eq!((set.clauses()[0].field.as_str(), set.clauses()[0].operator), ("id", Operator::Eq));
    assert_eq!(preview.count(&rows, &set)?, 0);

    set.set_field(first, "age", &registry)?;
    set.set_operator(first, Operator::Gte, &registry)?;
    set.set_value(first, "3")?;
    assert_eq!(preview.count(&rows, &set)?, 10);
    set.set_value(first, "35")?;
    assert_eq!(preview.count(&rows, &set)?, 3);

    let second = set.add_clause(&registry)?;
    set.set_field(second, "active", &registry)?;
    assert_eq!(set.get(second).map(|c| c.operator), Some(Operator::IsTrue));
    set.set_join(second, Join::Or)?;
    assert_eq!(labels(preview.apply(&rows, &set)?.iter()), vec!["Alice", "Charlie", "Diana", "Fiona", "George", "Hannah", "Ian", "Jane"]);

    set.set_inverted(true);
    assert_eq!(labels(preview.apply(&rows, &set)?.iter()), vec!["Bob", "Evan"]);
    assert_eq!(generate_selection_sql(&registry, &set)?, "NOT ( (age >= 35) OR (active = TRUE) )");
    Ok(())
}

#[test]
fn changing_field_resets_operator_and_values() -> Result<()> {
    let registry = FieldRegistry::employees();
    let mut set = ClauseSet::new();
    let id = set.add_clause(&registry)?;
    set.set_field(id, "hired", &registry)?;
    set.set_operator(id, Operator::Between, &registry)?;
    set.set_value(id, "2018-01-01")?;
    set.set_value2(id, "2019-01-01")?;
    set.set_join(id, Join::Or)?;

    set.set_field(id, "name", &registry)?;
    let clause = set.get(id).cloned().ok_or(Error::UnknownClause(id))?;
    assert_eq!(clause.operator, Operator::Eq);
    assert_eq!((clause.value.as_str(), clause.value2.as_str()), ("", ""));
    assert_eq!(clause.join, Join::Or);
    Ok(())
}

#[test]
fn illegal_operator_is_refused() -> Result<()> {
    let registry = FieldRegistry::employees();
    let mut set = ClauseSet::new();
    let id = set.add_clause(&registry)?;
    set.set_field(id, "age", &registry)?;

    let err = set.set_operator(id, Operator::Contains, &registry).unwrap_err();
    assert!(matches!(err, Error::IllegalOperator { operator: Operator::Contains, .. }));
    assert_eq!(set.get(id).map(|c| c.operator), Some(Operator::Eq));
    Ok(())
}

#[test]
fn removing_the_last_clause_leaves_a_fresh_one() -> Result<()> {
    let registry = FieldRegistry::employees();
    let mut set = ClauseSet::new();
    let a = set.add_clause(&registry)?;
    let b = set.add_clause(&registry)?;

    set.remove_clause(a, &registry)?;
    assert_eq!(set.clauses().iter().map(|c| c.id).collect::<Vec<_>>(), vec![b]);
    set.remove_clause(b, &registry)?;
    assert_eq!(set.len(), 1);
    assert!(set.clauses()[0].id > b);

    assert!(matches!(set.remove_clause(a, &registry), Err(Error::UnknownClause(_))));
    assert!(matches!(set.set_value(999, "x"), Err(Error::UnknownClause(999))));
    Ok(())
}

#[test]
fn reset_returns_to_no_filter() -> Result<()> {
    let registry = FieldRegistry::employees();
    let mut set = parse_query(&registry, "NOT ( (department = 'HR') )")?;
    set.reset();
    assert!(!set.is_inverted());
    assert_eq!(generate_selection_sql(&registry, &set)?, "No filter");
    assert_eq!(Preview::new(&registry).count(&employees(), &set)?, 10);
    Ok(())
}

#[test]
fn unknown_field_aborts_the_whole_list() {
    let registry = FieldRegistry::employees();
    let rows = employees();
    let mut set = ClauseSet::new();
    set.push(clauseql::Clause::new("age", Operator::Gt).value("30"));
    set.push(clauseql::Clause::new("salary", Operator::Gt).value("1000").or());

    assert!(matches!(Preview::new(&registry).count(&rows, &set), Err(Error::UnknownField(f)) if f == "salary"));
    assert!(matches!(generate_selection_sql(&registry, &set), Err(Error::UnknownField(_))));
}

#[test]
fn json_echo_survives_a_round_trip() -> Result<()> {
    let registry = FieldRegistry::employees();
    let set = parse_query(&registry, "WHERE (name LIKE '%o''b%') OR (age BETWEEN 20 AND 30)")?.inverted(true);
    let json = set.to_json()?;
    assert!(json.contains(r#""fieldKey":"name""#));
    assert!(json.contains(r#""join":"OR""#));

    let mut restored = ClauseSet::from_json(&json)?;
    assert_eq!(restored, set);
    assert_eq!(restored.fingerprint(), set.fingerprint());

    // ids keep counting from the restored clauses
    let id = restored.add_clause(&registry)?;
    assert_eq!(id, 3);
    assert_ne!(restored.fingerprint(), set.fingerprint());
    Ok(())
}
