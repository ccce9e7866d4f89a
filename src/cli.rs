use crate::config::{
    LoadOptions, DEFAULT_CONTINENTS_FILE, DEFAULT_DATA_DIR, DEFAULT_EMISSIONS_FILE,
    DEFAULT_MAX_YEAR, DEFAULT_MIN_YEAR,
};
use crate::metric::Metric;
use crate::metrics::efficiency::EfficiencyMetric;
use crate::metrics::fuel::FuelSource;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "co2_report",
    version,
    about = "Per-country CO2 and greenhouse-gas reports from the OWID dataset"
)]
pub struct Cli {
    /// Directory holding the dataset files.
    #[arg(long, env = "CO2_DATA_DIR", default_value = DEFAULT_DATA_DIR, global = true)]
    pub data_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_EMISSIONS_FILE, global = true)]
    pub emissions_file: String,

    #[arg(long, default_value = DEFAULT_CONTINENTS_FILE, global = true)]
    pub continents_file: String,

    /// Skip the continent mapping file entirely.
    #[arg(long, global = true)]
    pub no_continents: bool,

    #[arg(long, default_value_t = DEFAULT_MIN_YEAR, global = true)]
    pub min_year: i32,

    #[arg(long, default_value_t = DEFAULT_MAX_YEAR, global = true)]
    pub max_year: i32,

    /// Keep regional aggregates such as "World" (rows without an ISO code).
    ///
    /// Aggregates are then treated like countries: they join every ranking,
    /// continent total, summary and share denominator, so shares stop being
    /// shares of the country total.
    #[arg(long, global = true)]
    pub include_aggregates: bool,

    /// Default log level when RUST_LOG is unset.
    #[arg(long, default_value_t = Level::INFO, global = true)]
    pub log_level: Level,

    /// Rows shown per table preview.
    #[arg(long, default_value_t = 10, global = true)]
    pub rows: usize,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            data_dir: self.data_dir.clone(),
            emissions_file: self.emissions_file.clone(),
            continents_file: (!self.no_continents).then(|| self.continents_file.clone()),
            years: self.min_year..=self.max_year,
            include_aggregates: self.include_aggregates,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Headline totals and CO2 by continent.
    Summary {
        /// Defaults to every loaded year.
        #[arg(long)]
        year: Option<i32>,
        #[arg(long = "continent")]
        continents: Vec<String>,
    },
    /// CO2 by fuel source for a country, or globally.
    Fuel {
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        /// Fuel used for the top-consumers table.
        #[arg(long, default_value = "coal")]
        fuel: FuelSource,
        #[arg(short, default_value_t = 10)]
        n: usize,
    },
    /// Rank countries by any dataset column.
    Top {
        metric: Metric,
        #[arg(long)]
        year: Option<i32>,
        #[arg(short, default_value_t = 10)]
        n: usize,
        #[arg(long = "continent")]
        continents: Vec<String>,
        /// Smallest values first.
        #[arg(long)]
        ascending: bool,
    },
    /// Production vs consumption CO2 and the embodied-emissions trade balance.
    Trade {
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(short, default_value_t = 10)]
        n: usize,
    },
    /// Carbon intensity rankings and improvement over time.
    Efficiency {
        #[arg(long, default_value = "co2_per_gdp")]
        metric: EfficiencyMetric,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        from: Option<i32>,
        #[arg(long)]
        to: Option<i32>,
        #[arg(short, default_value_t = 10)]
        n: usize,
    },
    /// Cumulative emissions and historical share.
    History {
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(short, default_value_t = 10)]
        n: usize,
    },
    /// Methane and nitrous oxide alongside CO2.
    Ghg {
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(short, default_value_t = 10)]
        n: usize,
    },
    /// Temperature change attributed to each gas.
    Temperature {
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(short, default_value_t = 15)]
        n: usize,
    },
    /// GDP growth against CO2 per capita for one country.
    Country {
        name: String,
        /// Other countries to plot alongside `name`.
        #[arg(long = "compare")]
        compare: Vec<String>,
        /// Column compared across countries.
        #[arg(long, default_value = "co2_per_capita")]
        metric: Metric,
    },
    /// Countries whose GDP grew while CO2 per capita fell.
    GreenGrowth {
        /// List every country, not only the green-growth ones.
        #[arg(long)]
        all: bool,
    },
    /// Write every report as CSV plus summary.json.
    Export {
        #[arg(long, default_value = "reports")]
        out_dir: PathBuf,
        #[arg(long)]
        year: Option<i32>,
        #[arg(short, default_value_t = 15)]
        n: usize,
    },
}
