use crate::error::{EtlError, Result};
use crate::processors::CleanedTable;
use chrono::{DateTime, Utc};
use rusqlite::{params_from_iter, Connection, Transaction};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Owns the database connection for the load step. The connection is closed
/// when the writer is dropped, and an uncommitted transaction rolls back.
pub struct SqliteWriter {
    conn: Connection,
    path: PathBuf,
}

impl SqliteWriter {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| EtlError::StoreOpen {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }

        let conn = Connection::open(path)?;
        debug!("Opened database {}", path.display());

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            path: PathBuf::from(":memory:"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop and recreate every table in one transaction. If any table fails,
    /// none of this call's replacements are kept.
    pub fn replace_tables(&mut self, tables: &[CleanedTable]) -> Result<()> {
        let tx = self.conn.transaction()?;

        for cleaned in tables {
            let name = &cleaned.table.name;
            let rows = write_table(&tx, cleaned).map_err(|e| EtlError::store_write(name, e))?;
            info!("Replaced table '{}' ({} rows)", name, rows);
        }

        tx.commit()?;
        Ok(())
    }

    pub fn replace_table(&mut self, cleaned: &CleanedTable) -> Result<()> {
        self.replace_tables(std::slice::from_ref(cleaned))
    }

    pub fn table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' \
             AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    pub fn row_count(&self, table: &str) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table));
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn column_names(&self, table: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
        let names = stmt
            .query_map([table], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    /// Read back what is stored for `tables`.
    pub fn summarize(&self, tables: &[&str]) -> Result<LoadSummary> {
        let mut summaries = Vec::with_capacity(tables.len());
        for name in tables {
            summaries.push(TableSummary {
                name: name.to_string(),
                rows: self.row_count(name)?,
                columns: self.column_names(name)?.len(),
            });
        }

        Ok(LoadSummary {
            database: self.path.clone(),
            loaded_at: Utc::now(),
            tables: summaries,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close explicitly to surface errors that `Drop` would swallow.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| EtlError::Store(e))
    }
}

fn write_table(tx: &Transaction, cleaned: &CleanedTable) -> rusqlite::Result<usize> {
    let table = &cleaned.table;
    let name = quote_identifier(&table.name);

    let column_defs: Vec<String> = table
        .columns()
        .iter()
        .zip(&cleaned.kinds)
        .map(|(column, kind)| format!("{} {}", quote_identifier(&column.name), kind.sql_type()))
        .collect();
    let column_list: Vec<String> = table
        .columns()
        .iter()
        .map(|c| quote_identifier(&c.name))
        .collect();
    let placeholders: Vec<String> = (1..=column_list.len()).map(|i| format!("?{}", i)).collect();

    tx.execute(&format!("DROP TABLE IF EXISTS {}", name), [])?;
    tx.execute(
        &format!("CREATE TABLE {} ({})", name, column_defs.join(", ")),
        [],
    )?;

    let mut stmt = tx.prepare(&format!(
        "INSERT INTO {} ({}) VALUES ({})",
        name,
        column_list.join(", "),
        placeholders.join(", ")
    ))?;

    let mut written = 0;
    for index in 0..table.row_count() {
        if let Some(row) = table.row(index) {
            stmt.execute(params_from_iter(row))?;
            written += 1;
        }
    }

    Ok(written)
}

/// `crop production` -> `"crop production"`, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone)]
pub struct LoadSummary {
    pub database: PathBuf,
    pub loaded_at: DateTime<Utc>,
    pub tables: Vec<TableSummary>,
}

impl LoadSummary {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }

    pub fn table(&self, name: &str) -> Option<&TableSummary> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Database Summary:\n\
            - File: {}\n\
            - Loaded at: {}\n\
            - Tables: {}\n\
            - Total rows: {}",
            self.database.display(),
            self.loaded_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.tables.len(),
            self.total_rows()
        );

        for table in &self.tables {
            summary.push_str(&format!(
                "\n  {}: {} rows, {} columns",
                table.name, table.rows, table.columns
            ));
        }

        summary
    }
}
