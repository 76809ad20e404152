/// Source file names
pub const CROP_PRODUCTION_FILE: &str = "area_production_yield_data.csv";
pub const NORMAL_RAINFALL_FILE: &str = "normal_rainfall_data.csv";
pub const MONTHLY_RAINFALL_FILE: &str = "monthly_rainfall_data.csv";

/// Destination table names
pub const CROP_PRODUCTION_TABLE: &str = "crop_production";
pub const NORMAL_RAINFALL_TABLE: &str = "normal_rainfall";
pub const MONTHLY_RAINFALL_TABLE: &str = "monthly_rainfall";

/// Default locations, relative to the working directory
pub const DATA_DIR: &str = "data";
pub const RAW_CSV_DIR: &str = "csv data/raw";
pub const DATABASE_FILE: &str = "agriculture.db";

/// Configuration file and environment prefix
pub const CONFIG_FILE_STEM: &str = "agri-etl";
pub const ENV_PREFIX: &str = "AGRI_ETL";

/// Fill values for missing cells
pub const DEFAULT_NUMERIC_FILL: i64 = 0;
pub const DEFAULT_TEXT_FILL: &str = "Unknown";

/// Cell contents treated as missing
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub const MISSING_INPUT_HINT: &str =
    "Check that the CSV files are named correctly and placed under 'data/csv data/raw/'.";
