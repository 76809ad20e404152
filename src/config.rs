//! Job configuration.
//!
//! Input and output locations are carried in a [`PipelineConfig`] handed to
//! the loader by its caller. The defaults reproduce the fixed layout under
//! `data/` relative to the working directory; an optional `agri-etl.toml`
//! and `AGRI_ETL_*` environment variables are layered on top by
//! [`PipelineConfig::load`].

use crate::error::{EtlError, Result};
use crate::models::Dataset;
use crate::utils::constants::{
    CONFIG_FILE_STEM, DATABASE_FILE, DATA_DIR, DEFAULT_NUMERIC_FILL, DEFAULT_TEXT_FILL,
    ENV_PREFIX, RAW_CSV_DIR,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

/// Where one dataset is read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSource {
    pub dataset: Dataset,
    pub path: PathBuf,
}

impl DatasetSource {
    pub fn new(dataset: Dataset, path: impl Into<PathBuf>) -> Self {
        Self {
            dataset,
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PipelineConfig {
    pub database_path: PathBuf,

    #[validate(length(min = 1))]
    pub datasets: Vec<DatasetSource>,

    /// Replacement for missing cells in numeric columns
    pub numeric_fill: i64,

    /// Replacement for missing cells in text columns
    #[validate(length(min = 1))]
    pub text_fill: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::rooted_at(Path::new(""))
    }
}

impl PipelineConfig {
    /// Default layout with every path placed under `root`.
    pub fn rooted_at(root: &Path) -> Self {
        let raw_dir = root.join(DATA_DIR).join(RAW_CSV_DIR);

        Self {
            database_path: root.join(DATA_DIR).join(DATABASE_FILE),
            datasets: Dataset::ALL
                .iter()
                .map(|d| DatasetSource::new(*d, raw_dir.join(d.file_name())))
                .collect(),
            numeric_fill: DEFAULT_NUMERIC_FILL,
            text_fill: DEFAULT_TEXT_FILL.to_string(),
        }
    }

    /// Defaults, then `agri-etl.toml` in the working directory, then the
    /// environment.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    pub fn load_from(dir: &Path) -> Result<Self> {
        let defaults = Self::default();

        let settings = Config::builder()
            .add_source(Config::try_from(&defaults)?)
            .add_source(File::from(dir.join(CONFIG_FILE_STEM)).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: PipelineConfig = settings.try_deserialize()?;
        config.validate_all()?;

        debug!(
            "Loaded configuration: database={}, datasets={}",
            config.database_path.display(),
            config.datasets.len()
        );

        Ok(config)
    }

    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    pub fn source_for(&self, dataset: Dataset) -> Option<&DatasetSource> {
        self.datasets.iter().find(|s| s.dataset == dataset)
    }

    /// Field validation plus the rule that each dataset is listed exactly once.
    pub fn validate_all(&self) -> Result<()> {
        self.validate()?;

        if self.database_path.as_os_str().is_empty() {
            return Err(EtlError::Config("database_path must not be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for source in &self.datasets {
            if !seen.insert(source.dataset) {
                return Err(EtlError::Config(format!(
                    "dataset '{}' is configured more than once",
                    source.dataset.table_name()
                )));
            }
        }

        if let Some(missing) = Dataset::ALL.iter().find(|d| !seen.contains(d)) {
            return Err(EtlError::Config(format!(
                "no source configured for dataset '{}'",
                missing.table_name()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_paths() {
        let config = PipelineConfig::default();

        assert_eq!(config.database_path, PathBuf::from("data/agriculture.db"));
        assert_eq!(
            config.source_for(Dataset::CropProduction).map(|s| s.path.clone()),
            Some(PathBuf::from(
                "data/csv data/raw/area_production_yield_data.csv"
            ))
        );
        assert_eq!(config.text_fill, "Unknown");
        assert_eq!(config.numeric_fill, 0);
        assert!(config.validate_all().is_ok());
    }

    #[test]
    fn test_rooted_at() {
        let config = PipelineConfig::rooted_at(Path::new("/srv/agri"));
        assert_eq!(
            config.database_path,
            PathBuf::from("/srv/agri/data/agriculture.db")
        );
        assert!(config
            .datasets
            .iter()
            .all(|s| s.path.starts_with("/srv/agri/data/csv data/raw")));
    }

    #[test]
    fn test_duplicate_dataset_rejected() {
        let mut config = PipelineConfig::default();
        config.datasets.push(DatasetSource::new(
            Dataset::NormalRainfall,
            "other/normal.csv",
        ));

        assert!(matches!(config.validate_all(), Err(EtlError::Config(_))));
    }

    #[test]
    fn test_missing_dataset_rejected() {
        let mut config = PipelineConfig::default();
        config.datasets.retain(|s| s.dataset != Dataset::MonthlyRainfall);

        assert!(matches!(config.validate_all(), Err(EtlError::Config(_))));
    }

    #[test]
    fn test_empty_text_fill_rejected() {
        let mut config = PipelineConfig::default();
        config.text_fill.clear();

        assert!(matches!(config.validate_all(), Err(EtlError::Validation(_))));
    }

    #[test]
    fn test_load_from_file_overrides_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(
            dir.path().join("agri-etl.toml"),
            "database_path = \"out/test.db\"\ntext_fill = \"Not recorded\"\n",
        )?;

        let config = PipelineConfig::load_from(dir.path())?;

        assert_eq!(config.database_path, PathBuf::from("out/test.db"));
        assert_eq!(config.text_fill, "Not recorded");
        assert_eq!(config.datasets.len(), 3);
        Ok(())
    }

    #[test]
    fn test_load_without_file_uses_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let config = PipelineConfig::load_from(dir.path())?;
        assert_eq!(config.datasets, PipelineConfig::default().datasets);
        Ok(())
    }
}
