pub mod csv_reader;

pub use csv_reader::{is_missing_marker, parse_cell, CsvTableReader};
