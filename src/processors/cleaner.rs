use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{Column, ColumnKind, NumericKind, Table, Value};
use crate::processors::classifier::classify_column;
use crate::readers::is_missing_marker;
use crate::utils::constants::{DEFAULT_NUMERIC_FILL, DEFAULT_TEXT_FILL};
use std::collections::HashSet;
use tracing::debug;

/// Cell counts touched while cleaning one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningReport {
    pub numeric_filled: usize,
    pub text_filled: usize,
    pub trimmed: usize,
}

impl CleaningReport {
    pub fn summary(&self) -> String {
        format!(
            "{} numeric cells set to 0, {} text cells set to placeholder, {} values trimmed",
            self.numeric_filled, self.text_filled, self.trimmed
        )
    }
}

#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub table: Table,
    /// One decision per column, in column order
    pub kinds: Vec<ColumnKind>,
    pub report: CleaningReport,
}

pub struct Cleaner {
    numeric_fill: i64,
    text_fill: String,
}

impl Cleaner {
    pub fn new() -> Self {
        Self {
            numeric_fill: DEFAULT_NUMERIC_FILL,
            text_fill: DEFAULT_TEXT_FILL.to_string(),
        }
    }

    pub fn with_fills(numeric_fill: i64, text_fill: impl Into<String>) -> Self {
        Self {
            numeric_fill,
            text_fill: text_fill.into(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::with_fills(config.numeric_fill, config.text_fill.clone())
    }

    /// Return a cleaned copy of `table`; the input is left untouched.
    pub fn clean(&self, table: &Table) -> Result<CleanedTable> {
        let names = normalize_column_names(&table.column_names());
        let mut report = CleaningReport::default();
        let mut kinds = Vec::with_capacity(names.len());
        let mut columns = Vec::with_capacity(names.len());

        for (column, name) in table.columns().iter().zip(names) {
            let kind = classify_column(&column.values);
            let values = match kind {
                ColumnKind::Numeric(numeric) => {
                    self.fill_numeric(&column.values, numeric, &mut report)
                }
                ColumnKind::Textual => self.fill_text(&column.values, &mut report),
            };

            debug!("Column '{}' -> '{}' classified as {:?}", column.name, name, kind);
            kinds.push(kind);
            columns.push(Column::new(name, values));
        }

        Ok(CleanedTable {
            table: Table::new(table.name.clone(), columns)?,
            kinds,
            report,
        })
    }

    fn fill_numeric(
        &self,
        values: &[Value],
        kind: NumericKind,
        report: &mut CleaningReport,
    ) -> Vec<Value> {
        values
            .iter()
            .map(|value| {
                let parsed = match value {
                    Value::Integer(v) => Some(Value::Integer(*v)),
                    Value::Real(v) => Some(Value::Real(*v)),
                    Value::Text(s) if !is_missing_marker(s) => parse_numeric(s, kind),
                    _ => None,
                };

                let value = match parsed {
                    Some(v) => v,
                    None => {
                        report.numeric_filled += 1;
                        Value::Integer(self.numeric_fill)
                    }
                };

                match (kind, value) {
                    (NumericKind::Real, Value::Integer(v)) => Value::Real(v as f64),
                    (_, v) => v,
                }
            })
            .collect()
    }

    fn fill_text(&self, values: &[Value], report: &mut CleaningReport) -> Vec<Value> {
        values
            .iter()
            .map(|value| match value {
                Value::Null => {
                    report.text_filled += 1;
                    Value::Text(self.text_fill.clone())
                }
                Value::Text(s) if is_missing_marker(s) => {
                    report.text_filled += 1;
                    Value::Text(self.text_fill.clone())
                }
                Value::Text(s) => {
                    let trimmed = s.trim();
                    if trimmed.len() != s.len() {
                        report.trimmed += 1;
                    }
                    Value::Text(trimmed.to_string())
                }
                other => Value::Text(other.to_string()),
            })
            .collect()
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_numeric(raw: &str, kind: NumericKind) -> Option<Value> {
    let trimmed = raw.trim();
    match kind {
        NumericKind::Integer => trimmed.parse::<i64>().ok().map(Value::Integer),
        NumericKind::Real => trimmed.parse::<f64>().ok().map(Value::Real),
    }
}

/// `"District Name"` -> `"district_name"`.
pub fn normalize_column_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Normalize every name; names that collide after normalization get a
/// numeric suffix so the table stays writable.
pub fn normalize_column_names(names: &[&str]) -> Vec<String> {
    let mut seen = HashSet::new();

    names
        .iter()
        .map(|name| {
            let base = normalize_column_name(name);
            let mut candidate = base.clone();
            let mut suffix = 1;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            candidate
        })
        .collect()
}
