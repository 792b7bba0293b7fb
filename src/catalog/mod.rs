pub mod json_shape;
pub use json_shape::*;

pub mod field_descriptor;
pub use field_descriptor::*;

pub mod field_catalog;
pub use field_catalog::*;

pub mod value_accessor;
pub use value_accessor::*;
