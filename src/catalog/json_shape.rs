use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Coarse-grained shape of a JSON value.
///
/// Used to decide how a cell is formatted and to report what was found when a
/// map column holds something other than an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JsonShape {
    /// JSON null
    Null,
    /// JSON boolean
    Bool,
    /// Any JSON number
    Number,
    /// String
    String,
    /// JSON object (map)
    Object,
    /// JSON array
    Array,
}

impl JsonShape {
    /// Classify a serde_json `Value` into a `JsonShape`.
    pub fn of_value(v: &Value) -> JsonShape {
        match v {
            Value::Null => JsonShape::Null,
            Value::Bool(_) => JsonShape::Bool,
            Value::Number(_) => JsonShape::Number,
            Value::String(_) => JsonShape::String,
            Value::Array(_) => JsonShape::Array,
            Value::Object(_) => JsonShape::Object,
        }
    }

    /// Whether a value of this shape may back a map column.
    ///
    /// Null counts: a null map simply contributes no keys.
    pub fn is_map_compatible(self) -> bool {
        matches!(self, JsonShape::Null | JsonShape::Object)
    }
}

impl Display for JsonShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            JsonShape::Null => "null",
            JsonShape::Bool => "a boolean",
            JsonShape::Number => "a number",
            JsonShape::String => "a string",
            JsonShape::Object => "an object",
            JsonShape::Array => "an array",
        };
        f.write_str(text)
    }
}
