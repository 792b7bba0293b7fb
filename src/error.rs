use thiserror::Error;

use crate::catalog::JsonShape;

/// Errors raised while resolving a schema or writing rows.
///
/// Every variant aborts the current operation; no partial row is ever
/// returned or written once one of these is raised.
#[derive(Error, Debug)]
pub enum CsvError {
    /// A map column holds something that is not an object.
    #[error("Schema error: field '{field}' is declared as a map column but holds {found}")]
    Schema { field: String, found: JsonShape },

    /// `next_row` was called with no records left.
    #[error("No such element exists: the iterator is exhausted")]
    Exhausted,

    /// A session entry point needed records but none were supplied.
    #[error("Data is not set")]
    MissingData,

    /// A session entry point needed an output sink but none was configured.
    #[error("Writer is not set")]
    MissingSink,

    /// The value accessor could not find the field on a record.
    #[error("Missing field '{field}'")]
    MissingField { field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CsvError {
    pub fn schema(field: impl Into<String>, found: JsonShape) -> Self {
        Self::Schema { field: field.into(), found }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField { field: field.into() }
    }
}

pub type CsvResult<T> = Result<T, CsvError>;
