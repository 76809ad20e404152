use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EtlError>;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Could not find the {dataset} file at {}", path.display())]
    MissingInput { dataset: String, path: PathBuf },

    #[error("Failed to write table '{table}': {source}")]
    StoreWrite {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Could not prepare database location {}: {source}", path.display())]
    StoreOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Database error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl EtlError {
    /// The two failures the job reports as diagnostics instead of crashing:
    /// a missing input file and a failure opening or writing the store.
    pub fn is_job_abort(&self) -> bool {
        matches!(
            self,
            EtlError::MissingInput { .. }
                | EtlError::StoreOpen { .. }
                | EtlError::StoreWrite { .. }
                | EtlError::Store(_)
        )
    }

    pub fn store_write(table: impl Into<String>, source: rusqlite::Error) -> Self {
        EtlError::StoreWrite {
            table: table.into(),
            source,
        }
    }
}
