pub mod dataset;
pub mod table;
pub mod value;

pub use dataset::Dataset;
pub use table::{Column, Table};
pub use value::{ColumnKind, NumericKind, Value};
