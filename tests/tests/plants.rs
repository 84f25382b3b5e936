//! Per-phase pollution parameters on the treatment plant dataset

mod common;

use anyhow::Result;
use clauseql::selection::sql::generate_selection_sql;
use clauseql::{BetweenPolicy, Clause, ClauseSet, FieldRegistry, FilterConfig, Operator, Preview};
use clauseql_tests::{labels, plants};

fn select(set: &ClauseSet) -> Result<Vec<String>> {
    let registry = FieldRegistry::treatment_plants();
    let rows = plants();
    Ok(labels(Preview::new(&registry).apply(&rows, set)?.iter()))
}

#[test]
fn phase_fields_read_the_phase() -> Result<()> {
    assert_eq!(select(&ClauseSet::with_clauses([Clause::new("BOD_P1", Operator::Lte).value("20")]))?, vec!["kochi", "pune"]);
    assert_eq!(select(&ClauseSet::with_clauses([Clause::new("BOD_P3", Operator::Gt).value("40")]))?, vec!["pune"]);
    Ok(())
}

#[test]
fn general_field_reads_the_maximum() -> Result<()> {
    assert_eq!(select(&ClauseSet::with_clauses([Clause::new("BOD", Operator::Gt).value("20")]))?, vec!["kochi", "pune"]);
    assert_eq!(select(&ClauseSet::with_clauses([Clause::new("COD", Operator::Eq).value("120")]))?, vec!["kochi"]);
    Ok(())
}

#[test]
fn missing_phase_fails_the_record() -> Result<()> {
    // agra only reports a general BOD reading; kochi has no third phase
    let set = ClauseSet::with_clauses([Clause::new("BOD_P3", Operator::Lt).value("1000"), Clause::new("totalScore", Operator::Gte).value("0").or()]);
    assert_eq!(select(&set)?, vec!["pune"]);

    let set = ClauseSet::with_clauses([Clause::new("capacity", Operator::Gt).value("0"), Clause::new("BOD_P1", Operator::IsNotEmpty).or()]);
    assert_eq!(select(&set)?, vec!["kochi", "pune"]);
    Ok(())
}

#[test]
fn inverting_a_failed_record_passes_it() -> Result<()> {
    let set = ClauseSet::with_clauses([Clause::new("BOD_P3", Operator::Gt).value("40")]).inverted(true);
    assert_eq!(select(&set)?, vec!["kochi", "agra"]);
    Ok(())
}

#[test]
fn missing_parameter_fails_its_phases() -> Result<()> {
    // kochi and agra carry no TSS at all, so every TSS phase fails the record
    for set in [
        ClauseSet::with_clauses([Clause::new("TSS_P1", Operator::IsEmpty), Clause::new("capacity", Operator::Gt).value("100").or()]),
        ClauseSet::with_clauses([Clause::new("TSS_P1", Operator::Neq).value("5")]),
        ClauseSet::with_clauses([Clause::new("TSS_P1", Operator::Lt).value("1000"), Clause::new("capacity", Operator::Gt).value("0").or()]),
        ClauseSet::with_clauses([Clause::new("TSS_P1", Operator::Gt).value("50")]),
    ] {
        assert_eq!(select(&set)?, vec!["pune"], "{:?}", set);
    }

    // the general field names no phase and reads as absent
    let set = ClauseSet::with_clauses([Clause::new("TSS", Operator::IsEmpty)]);
    assert_eq!(select(&set)?, vec!["kochi", "agra"]);
    Ok(())
}

#[test]
fn swapped_between_bounds() -> Result<()> {
    let registry = FieldRegistry::treatment_plants();
    let rows = plants();
    let set = ClauseSet::with_clauses([Clause::new("opPercent", Operator::Between).between("90", "40")]);

    assert_eq!(Preview::new(&registry).count(&rows, &set)?, 0);
    let swapping = Preview::with_config(&registry, FilterConfig::default().with_between(BetweenPolicy::Swap));
    assert_eq!(labels(swapping.apply(&rows, &set)?.iter()), vec!["kochi", "pune"]);
    Ok(())
}

#[test]
fn custom_path_separator() -> Result<()> {
    let registry = FieldRegistry::from_json(r#"[{"key":"BOD.P2","label":"BOD - Phase 2","type":"number"}]"#)?;
    let rows = plants();
    let set = ClauseSet::with_clauses([Clause::new("BOD.P2", Operator::Gte).value("25")]);

    let dotted = Preview::with_config(&registry, FilterConfig::default().with_path_separator('.'));
    assert_eq!(labels(dotted.apply(&rows, &set)?.iter()), vec!["kochi", "pune"]);
    // with the default separator the key is not split and reads as absent
    assert_eq!(Preview::new(&registry).count(&rows, &set)?, 0);
    Ok(())
}

#[test]
fn phase_filters_render() -> Result<()> {
    let registry = FieldRegistry::treatment_plants();
    let set = ClauseSet::with_clauses([Clause::new("BOD_P3", Operator::Gt).value("40"), Clause::new("COD", Operator::Between).between("100", "150").or()]);
    assert_eq!(generate_selection_sql(&registry, &set)?, "WHERE (BOD_P3 > 40) OR (COD BETWEEN 100 AND 150)");
    Ok(())
}
