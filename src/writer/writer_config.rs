use serde::{Deserialize, Serialize};

use crate::error::CsvResult;

/// Text layout used by a write session.
///
/// - `delimiter` separates cells of a row.
/// - `line_separator` terminates the header and separates rows.
/// - `null_value` replaces null values.
/// - `list_separator` separates items of arrays and maps rendered in one cell.
/// - `include_header` controls whether full-document writes start with the header.
///
/// Separators are written verbatim; cell content containing them is not
/// escaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    pub delimiter: String,
    pub line_separator: String,
    pub null_value: String,
    pub list_separator: String,
    pub include_header: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            line_separator: "\n".to_string(),
            null_value: "null".to_string(),
            list_separator: ";".to_string(),
            include_header: true,
        }
    }
}

impl WriterConfig {
    /// Create default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tab separated values, otherwise default.
    pub fn tsv() -> Self {
        Self::default().with_delimiter("\t")
    }

    /// Parse a configuration from JSON; missing keys take their defaults.
    pub fn from_json(text: &str) -> CsvResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_delimiter(mut self, delimiter: &str) -> Self {
        self.delimiter = delimiter.to_string();
        self
    }

    pub fn with_line_separator(mut self, line_separator: &str) -> Self {
        self.line_separator = line_separator.to_string();
        self
    }

    pub fn with_null_value(mut self, null_value: &str) -> Self {
        self.null_value = null_value.to_string();
        self
    }

    pub fn with_list_separator(mut self, list_separator: &str) -> Self {
        self.list_separator = list_separator.to_string();
        self
    }

    pub fn with_header(mut self, include_header: bool) -> Self {
        self.include_header = include_header;
        self
    }
}
