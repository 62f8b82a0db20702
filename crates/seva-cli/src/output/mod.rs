use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Columns shown first (in this order) when a list of records is printed as a
/// table. Records with none of them fall back to every key, sorted.
const LEAD_COLUMNS: [&str; 14] = [
    "id",
    "title",
    "name",
    "category",
    "status",
    "priority",
    "ward",
    "department",
    "phone",
    "reportedBy",
    "assignedTo",
    "entityType",
    "entityId",
    "action",
];

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => Ok(render_table(&serde_json::to_value(value)?)),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table(value: &Value) -> String {
    match value {
        Value::Array(items) => render_list(items),
        Value::Object(map) => {
            let rows = map
                .iter()
                .map(|(key, value)| vec![key.clone(), cell(value)])
                .collect::<Vec<_>>();
            table::render_rows(&["field", "value"], &rows, table_options())
        }
        scalar => cell(scalar),
    }
}

fn render_list(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(none)");
    }
    let records = items.iter().filter_map(Value::as_object).collect::<Vec<_>>();
    if records.len() != items.len() {
        let rows = items.iter().map(|item| vec![cell(item)]).collect::<Vec<_>>();
        return table::render_rows(&["value"], &rows, table_options());
    }

    let columns = list_columns(&records);
    let headers = columns.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| record.get(column).map_or_else(|| String::from("-"), cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    table::render_rows(&headers, &rows, table_options())
}

fn list_columns(records: &[&Map<String, Value>]) -> Vec<String> {
    let present = |key: &str| records.iter().any(|record| record.contains_key(key));
    let lead = LEAD_COLUMNS
        .iter()
        .filter(|key| present(**key))
        .map(|key| (*key).to_string())
        .collect::<Vec<_>>();
    if !lead.is_empty() {
        return lead;
    }

    let mut all = records
        .iter()
        .flat_map(|record| record.keys().cloned())
        .collect::<Vec<_>>();
    all.sort();
    all.dedup();
    all
}

/// One-line form of a JSON value. Reporter and assignment objects collapse to
/// the person's name; lists of strings are joined.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => ["name", "workerName"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map_or_else(|| value.to_string(), String::from),
        other => other.to_string(),
    }
}
