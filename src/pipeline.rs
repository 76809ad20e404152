use crate::config::PipelineConfig;
use crate::error::{EtlError, Result};
use crate::models::{Dataset, Table};
use crate::processors::{CleanedTable, Cleaner};
use crate::readers::CsvTableReader;
use crate::utils::progress::ProgressReporter;
use crate::writers::{LoadSummary, SqliteWriter};
use tracing::{info, warn};

const STAGES: usize = 3;

/// Extract -> Transform -> Load over the three source datasets.
pub struct BatchLoader {
    config: PipelineConfig,
    reader: CsvTableReader,
    cleaner: Cleaner,
    show_progress: bool,
}

impl BatchLoader {
    pub fn new(config: PipelineConfig) -> Self {
        let cleaner = Cleaner::from_config(&config);
        Self {
            config,
            reader: CsvTableReader::new(),
            cleaner,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn run(&self) -> Result<LoadSummary> {
        let progress =
            ProgressReporter::new_spinner("Starting ETL pipeline...", !self.show_progress);
        info!("Starting ETL pipeline");

        match self.run_stages(&progress) {
            Ok(summary) => {
                progress.finish_with_message(&format!(
                    "Loaded {} rows into {}",
                    summary.total_rows(),
                    summary.database.display()
                ));
                info!("ETL pipeline complete");
                Ok(summary)
            }
            Err(e) => {
                progress.abandon_with_message("ETL pipeline aborted");
                Err(e)
            }
        }
    }

    fn run_stages(&self, progress: &ProgressReporter) -> Result<LoadSummary> {
        progress.stage(1, STAGES, "Reading source CSVs");
        let raw = self.extract()?;
        info!("Loaded {} source files", raw.len());

        progress.stage(2, STAGES, "Cleaning tables");
        let cleaned = self.transform(&raw)?;

        progress.stage(3, STAGES, "Writing tables to the database");
        self.load(&cleaned)
    }

    /// Read every dataset. Any missing file aborts before anything else runs.
    pub fn extract(&self) -> Result<Vec<Table>> {
        let mut tables = Vec::with_capacity(Dataset::ALL.len());

        for dataset in Dataset::ALL {
            let source = self.config.source_for(dataset).ok_or_else(|| {
                EtlError::Config(format!("no source configured for '{}'", dataset.table_name()))
            })?;

            let table = self.reader.read_dataset(dataset, &source.path)?;
            info!(
                "Read {} ({} rows) from {}",
                dataset,
                table.row_count(),
                source.path.display()
            );
            tables.push(table);
        }

        Ok(tables)
    }

    pub fn transform(&self, tables: &[Table]) -> Result<Vec<CleanedTable>> {
        tables
            .iter()
            .map(|table| {
                let cleaned = self.cleaner.clean(table)?;
                info!("Cleaned '{}': {}", table.name, cleaned.report.summary());
                if cleaned.table.row_count() == 0 {
                    warn!("Table '{}' has no rows", table.name);
                }
                Ok(cleaned)
            })
            .collect()
    }

    /// One connection for all tables, released on every exit path.
    pub fn load(&self, tables: &[CleanedTable]) -> Result<LoadSummary> {
        let mut writer = SqliteWriter::open(&self.config.database_path)?;
        writer.replace_tables(tables)?;

        let names: Vec<&str> = tables.iter().map(|t| t.table.name.as_str()).collect();
        let summary = writer.summarize(&names)?;
        writer.close()?;

        Ok(summary)
    }
}
