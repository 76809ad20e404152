use crate::utils::constants::{
    CROP_PRODUCTION_FILE, CROP_PRODUCTION_TABLE, MONTHLY_RAINFALL_FILE, MONTHLY_RAINFALL_TABLE,
    NORMAL_RAINFALL_FILE, NORMAL_RAINFALL_TABLE,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three source extracts loaded by the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    CropProduction,
    NormalRainfall,
    MonthlyRainfall,
}

impl Dataset {
    /// Load order.
    pub const ALL: [Dataset; 3] = [
        Dataset::CropProduction,
        Dataset::NormalRainfall,
        Dataset::MonthlyRainfall,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            Dataset::CropProduction => CROP_PRODUCTION_TABLE,
            Dataset::NormalRainfall => NORMAL_RAINFALL_TABLE,
            Dataset::MonthlyRainfall => MONTHLY_RAINFALL_TABLE,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Dataset::CropProduction => CROP_PRODUCTION_FILE,
            Dataset::NormalRainfall => NORMAL_RAINFALL_FILE,
            Dataset::MonthlyRainfall => MONTHLY_RAINFALL_FILE,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Dataset::CropProduction => "crop production",
            Dataset::NormalRainfall => "normal rainfall",
            Dataset::MonthlyRainfall => "monthly rainfall",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
