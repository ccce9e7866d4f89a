use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_EMISSIONS_FILE: &str = "owid-co2-data.csv";
pub const DEFAULT_CONTINENTS_FILE: &str = "country-and-continent-codes-list-csv.csv";
pub const DEFAULT_MIN_YEAR: i32 = 2000;
pub const DEFAULT_MAX_YEAR: i32 = 2022;

/// Where the dataset lives and which rows to keep.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    pub data_dir: PathBuf,
    pub emissions_file: String,
    /// Continent mapping file; when absent on disk every country is "Other".
    pub continents_file: Option<String>,
    pub years: RangeInclusive<i32>,
    /// Keep regional aggregates (rows without an ISO code). They are not told
    /// apart from countries afterwards and count toward every cross-country
    /// sum.
    pub include_aggregates: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            emissions_file: DEFAULT_EMISSIONS_FILE.to_string(),
            continents_file: Some(DEFAULT_CONTINENTS_FILE.to_string()),
            years: DEFAULT_MIN_YEAR..=DEFAULT_MAX_YEAR,
            include_aggregates: false,
        }
    }
}

impl LoadOptions {
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_years(mut self, years: RangeInclusive<i32>) -> Self {
        self.years = years;
        self
    }

    pub fn emissions_path(&self) -> PathBuf {
        self.data_dir.join(&self.emissions_file)
    }

    pub fn continents_path(&self) -> Option<PathBuf> {
        self.continents_file.as_ref().map(|f| self.data_dir.join(f))
    }
}
