use qp_pattern::{ColumnOrigin, TableOrigin};
use serde_json::{Map, Value};

/// Reads a schema table entry as a [`TableOrigin`].
///
/// Shapes are tried in order: plain string, `{"tablename": ..}`,
/// `{"name": .., "columns": [..]}`, `{"meta": {"db_table": ..}}`.
/// Anything else becomes [`TableOrigin::Unrecognized`].
pub fn table_origin(value: &Value) -> TableOrigin {
    match value {
        Value::String(name) => TableOrigin::Name(name.clone()),
        Value::Object(map) => {
            if let Some(tablename) = text(map, "tablename") {
                TableOrigin::Declarative { tablename }
            } else if let (Some(name), Some(Value::Array(columns))) =
                (text(map, "name"), map.get("columns"))
            {
                TableOrigin::Core {
                    name,
                    columns: columns
                        .iter()
                        .filter_map(|c| column_origin(c).resolve().ok().map(str::to_string))
                        .collect(),
                }
            } else if let Some(db_table) = map
                .get("meta")
                .and_then(Value::as_object)
                .and_then(|meta| text(meta, "db_table"))
            {
                TableOrigin::Nested { db_table }
            } else {
                TableOrigin::Unrecognized(kind(value))
            }
        }
        other => TableOrigin::Unrecognized(kind(other)),
    }
}

/// Reads a schema column entry as a [`ColumnOrigin`]: plain string,
/// `{"key": ..}`, or `{"name": ..}`.
pub fn column_origin(value: &Value) -> ColumnOrigin {
    match value {
        Value::String(name) => ColumnOrigin::Name(name.clone()),
        Value::Object(map) => match (text(map, "key"), text(map, "name")) {
            (Some(key), _) => ColumnOrigin::Keyed { key },
            (None, Some(name)) => ColumnOrigin::Named { name },
            (None, None) => ColumnOrigin::Unrecognized(kind(value)),
        },
        other => ColumnOrigin::Unrecognized(kind(other)),
    }
}

fn text(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Descriptive type of a JSON value for diagnostics.
fn kind(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "bool".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(_) => "array".to_string(),
        Value::Object(map) => format!(
            "object {{{}}}",
            map.keys().cloned().collect::<Vec<String>>().join(", ")
        ),
    }
}
