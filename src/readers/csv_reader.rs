use crate::error::{EtlError, Result};
use crate::models::{Dataset, Table, Value};
use crate::utils::constants::MISSING_MARKERS;
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Reads a header-first delimited file into a [`Table`]. Every cell is kept
/// as raw text; classification happens later in the cleaner.
pub struct CsvTableReader {
    delimiter: u8,
}

impl CsvTableReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Read one of the job's source files, naming the table after the dataset.
    pub fn read_dataset(&self, dataset: Dataset, path: &Path) -> Result<Table> {
        if !path.is_file() {
            return Err(EtlError::MissingInput {
                dataset: dataset.label().to_string(),
                path: path.to_path_buf(),
            });
        }

        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => EtlError::MissingInput {
                dataset: dataset.label().to_string(),
                path: path.to_path_buf(),
            },
            _ => EtlError::Io(e),
        })?;

        let table = self.read_bytes(dataset.table_name(), &bytes)?;
        debug!(
            "Read {} rows x {} columns from {}",
            table.row_count(),
            table.column_count(),
            path.display()
        );
        Ok(table)
    }

    /// Parse CSV content held in memory. A UTF-8 byte-order mark is dropped.
    pub fn read_bytes(&self, table_name: &str, bytes: &[u8]) -> Result<Table> {
        let (content, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
        if had_errors {
            return Err(EtlError::InvalidFormat(format!(
                "Input for '{}' is not valid UTF-8",
                table_name
            )));
        }

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = dedupe_headers(reader.headers()?);
        if headers.is_empty() {
            return Err(EtlError::InvalidFormat(format!(
                "Input for '{}' has no header row",
                table_name
            )));
        }

        let mut rows = Vec::new();

        for record in reader.records() {
            let record = record?;
            rows.push(self.parse_record(table_name, &record, headers.len())?);
        }

        Table::from_rows(table_name, headers, rows)
    }

    fn parse_record(
        &self,
        table_name: &str,
        record: &StringRecord,
        width: usize,
    ) -> Result<Vec<Value>> {
        if record.len() > width {
            let line = record.position().map_or(0, |p| p.line());
            return Err(EtlError::InvalidFormat(format!(
                "Line {} of '{}' has {} fields, header has {}",
                line,
                table_name,
                record.len(),
                width
            )));
        }

        let mut row: Vec<Value> = record.iter().map(parse_cell).collect();
        // Short rows are padded with missing cells
        row.resize(width, Value::Null);
        Ok(row)
    }
}

impl Default for CsvTableReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Cells matching a missing-value marker (after trimming) become `Null`;
/// everything else is kept verbatim.
pub fn parse_cell(raw: &str) -> Value {
    if is_missing_marker(raw) {
        Value::Null
    } else {
        Value::Text(raw.to_string())
    }
}

pub fn is_missing_marker(raw: &str) -> bool {
    let trimmed = raw.trim();
    MISSING_MARKERS.contains(&trimmed)
}

/// Blank headers become `unnamed_<index>`; repeats get `.1`, `.2`, ...
fn dedupe_headers(record: &StringRecord) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut headers = Vec::with_capacity(record.len());

    for (index, raw) in record.iter().enumerate() {
        let base = if raw.trim().is_empty() {
            format!("unnamed_{}", index)
        } else {
            raw.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }

        seen.insert(name.clone());
        headers.push(name);
    }

    headers
}
