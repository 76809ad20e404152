pub mod sqlite_writer;

pub use sqlite_writer::{quote_identifier, LoadSummary, SqliteWriter, TableSummary};
