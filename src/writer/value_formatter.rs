use indexmap::IndexSet;
use serde_json::Value;

use crate::{
    catalog::JsonShape,
    error::{CsvError, CsvResult},
};

/// Pure conversions from values to cell text.
pub struct ValueFormatter;

impl ValueFormatter {
    /// Plain text form of a value, used for collection items and map cells.
    ///
    /// Strings are written without quotes and null is the literal `null`,
    /// whatever null token the session uses. Nested arrays and objects are
    /// written as compact JSON.
    pub fn natural_text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Cell text of a scalar column.
    pub fn format_scalar(value: &Value, null_value: &str, list_separator: &str) -> String {
        match value {
            Value::Null => null_value.to_string(),
            Value::Array(items) => {
                let items: Vec<String> = items.iter().map(Self::natural_text).collect();
                format!("[{}]", items.join(list_separator))
            }
            Value::Object(map) => {
                let entries: Vec<String> = map
                    .iter()
                    .map(|(key, value)| format!("{key}={}", Self::natural_text(value)))
                    .collect();
                format!("{{{}}}", entries.join(list_separator))
            }
            other => Self::natural_text(other),
        }
    }

    /// Cells of a map column, one per resolved key.
    ///
    /// A null map yields the null token for every key. A key missing from a
    /// non-null map yields the literal `null`, exactly like a key mapped to
    /// null.
    pub fn format_map_cells(
        field_name: &str,
        value: &Value,
        keys: &IndexSet<String>,
        null_value: &str,
    ) -> CsvResult<Vec<String>> {
        match value {
            Value::Null => Ok(vec![null_value.to_string(); keys.len()]),
            Value::Object(map) => Ok(keys
                .iter()
                .map(|key| map.get(key).map_or_else(|| "null".to_string(), Self::natural_text))
                .collect()),
            other => Err(CsvError::schema(field_name, JsonShape::of_value(other))),
        }
    }
}
