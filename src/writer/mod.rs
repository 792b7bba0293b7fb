pub mod writer_config;
pub use writer_config::*;

pub mod value_formatter;
pub use value_formatter::*;

pub mod row_renderer;
pub use row_renderer::*;

pub mod write_iterator;
pub use write_iterator::*;

pub mod csv_writer;
pub use csv_writer::*;
