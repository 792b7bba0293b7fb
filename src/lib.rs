pub mod error;
pub use error::{CsvError, CsvResult};

pub mod catalog;
pub use catalog::{
    FieldCatalog, FieldDescriptor, JsonShape, MapColumnSpec, ValueAccessor, to_records,
};

pub mod schema;
pub use schema::{Column, ColumnKind, Schema, SchemaBuilder};

pub mod writer;
pub use writer::{CsvWriter, RowRenderer, ValueFormatter, WriteIterator, WriterConfig};
