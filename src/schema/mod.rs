pub mod column;
pub use column::*;

pub mod csv_schema;
pub use csv_schema::*;

pub mod schema_builder;
pub use schema_builder::*;
