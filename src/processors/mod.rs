pub mod classifier;
pub mod cleaner;

pub use classifier::{classify_column, parse_number};
pub use cleaner::{
    normalize_column_name, normalize_column_names, CleanedTable, Cleaner, CleaningReport,
};
