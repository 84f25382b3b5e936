use clauseql::selection::sql::generate_selection_sql;
use clauseql::{parse_query, ClauseSet, FieldRegistry, Join, Operator, Preview};
use serde_json::{json, Map, Value};
use tracing::Level;

fn sample_data() -> Vec<Map<String, Value>> {
    let rows = json!([
        { "id": 1, "name": "Alice Johnson", "age": 28, "department": "Engineering", "hired": "2020-03-15", "active": true },
        { "id": 2, "name": "Bob Smith", "age": 34, "department": "Marketing", "hired": "2018-07-22", "active": false },
        { "id": 3, "name": "Charlie Brown", "age": 22, "department": "Engineering", "hired": "2021-11-01", "active": true },
        { "id": 4, "name": "Diana Prince", "age": 40, "department": "HR", "hired": "2015-01-10", "active": true },
        { "id": 5, "name": "Evan Wright", "age": 29, "department": "Marketing", "hired": "2019-05-30", "active": false },
        { "id": 6, "name": "Fiona Gallagher", "age": 31, "department": "Operations", "hired": "2017-09-12", "active": true },
        { "id": 7, "name": "George Miller", "age": 45, "department": "Engineering", "hired": "2010-06-25", "active": true },
        { "id": 8, "name": "Hannah Lee", "age": 26, "department": "HR", "hired": "2022-02-14", "active": true },
        { "id": 9, "name": "Ian Curtis", "age": 38, "department": "Operations", "hired": "2016-04-18", "active": false },
        { "id": 10, "name": "Jane Doe", "age": 24, "department": "Engineering", "hired": "2023-01-05", "active": true },
    ]);
    match rows {
        Value::Array(rows) => rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let registry = FieldRegistry::employees();
    let records = sample_data();
    let preview = Preview::new(&registry);

    // Build the filter the way the UI would: edit a default clause, then add another.
    let mut set = ClauseSet::new();
    set.ensure_clause(&registry)?;
    let first = set.clauses()[0].id;
    set.set_field(first, "department", &registry)?;
    set.set_value(first, "engineering")?;
    println!("preview after first edit: {}", preview.count(&records, &set)?);
    set.set_operator(first, Operator::Contains, &registry)?;
    println!("preview after operator change: {}", preview.count(&records, &set)?);

    let second = set.add_clause(&registry)?;
    set.set_field(second, "hired", &registry)?;
    set.set_operator(second, Operator::Between, &registry)?;
    set.set_value(second, "2019-01-01")?;
    set.set_value2(second, "2023-12-31")?;
    set.set_join(second, Join::And)?;
    println!("preview: {}", preview.count(&records, &set)?);

    let sql = generate_selection_sql(&registry, &set)?;
    println!("{sql}");
    println!("{}", set.to_json_pretty()?);

    let projection = preview.apply(&records, &set)?;
    println!("{} record(s) match", projection.count);
    for record in projection.iter() {
        println!("  {} ({})", record["name"], record["hired"]);
    }

    let reparsed = parse_query(&registry, &sql)?;
    assert_eq!(reparsed.fingerprint(), set.fingerprint());
    Ok(())
}
