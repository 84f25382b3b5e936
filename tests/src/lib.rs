//! Shared datasets for the integration tests.

use clauseql::record::json_to_value;
use clauseql::{Filterable, Value};
use serde_json::{json, Map};

/// A record backed by a JSON object, labelled for readable assertions
#[derive(Debug, Clone)]
pub struct Row {
    pub label: String,
    pub data: Map<String, serde_json::Value>,
}

impl Row {
    pub fn new(label: impl Into<String>, data: serde_json::Value) -> Self {
        let data = serde_json::from_value(data).expect("row data is a JSON object");
        Self { label: label.into(), data }
    }
}

impl Filterable for Row {
    fn value(&self, name: &str) -> Option<Value> { self.data.get(name).and_then(json_to_value) }
}

pub fn labels<'a>(rows: impl IntoIterator<Item = &'a Row>) -> Vec<String> { rows.into_iter().map(|r| r.label.clone()).collect() }

/// The employee table behind the tabular query builder
pub fn employees() -> Vec<Row> {
    [
        json!({ "id": 1, "name": "Alice Johnson", "age": 28, "department": "Engineering", "hired": "2020-03-15", "active": true }),
        json!({ "id": 2, "name": "Bob Smith", "age": 34, "department": "Marketing", "hired": "2018-07-22", "active": false }),
        json!({ "id": 3, "name": "Charlie Brown", "age": 22, "department": "Engineering", "hired": "2021-11-01", "active": true }),
        json!({ "id": 4, "name": "Diana Prince", "age": 40, "department": "HR", "hired": "2015-01-10", "active": true }),
        json!({ "id": 5, "name": "Evan Wright", "age": 29, "department": "Marketing", "hired": "2019-05-30", "active": false }),
        json!({ "id": 6, "name": "Fiona Gallagher", "age": 31, "department": "Operations", "hired": "2017-09-12", "active": true }),
        json!({ "id": 7, "name": "George Miller", "age": 45, "department": "Engineering", "hired": "2010-06-25", "active": true }),
        json!({ "id": 8, "name": "Hannah Lee", "age": 26, "department": "HR", "hired": "2022-02-14", "active": true }),
        json!({ "id": 9, "name": "Ian Curtis", "age": 38, "department": "Operations", "hired": "2016-04-18", "active": false }),
        json!({ "id": 10, "name": "Jane Doe", "age": 24, "department": "Engineering", "hired": "2023-01-05", "active": true }),
    ]
    .into_iter()
    .map(|data| {
        let label = data["name"].as_str().unwrap_or_default().split(' ').next().unwrap_or_default().to_string();
        Row::new(label, data)
    })
    .collect()
}

/// Treatment plants with pollution parameters measured per phase
pub fn plants() -> Vec<Row> {
    vec![
        Row::new(
            "kochi",
            json!({
                "capacity": 50, "opCapacity": 42, "opPercent": 84, "totalScore": 48,
                "BOD": { "max": 30, "phases": { "P1": 20, "P2": 30 } },
                "COD": { "max": 120, "phases": { "P1": 120 } },
            }),
        ),
        Row::new(
            "pune",
            json!({
                "capacity": 120, "opCapacity": 60, "opPercent": 50, "totalScore": 35,
                "BOD": { "max": 45, "phases": { "P1": 10, "P2": 25, "P3": 45 } },
                "TSS": { "max": 80, "phases": { "P1": 80 } },
            }),
        ),
        Row::new(
            "agra",
            json!({
                "capacity": 8, "opCapacity": 0, "opPercent": 0, "totalScore": 12,
                "BOD": { "max": 12, "phases": { "Gen": 12 } },
            }),
        ),
    ]
}
