// Per-country CO2 and greenhouse-gas statistics over the OWID emissions
// dataset.
//
// `loader` builds an immutable `EmissionsTable`; the `metrics` modules
// query it without side effects; `reports` and `output` format and write
// the results.

pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod metric;
pub mod metrics;
pub mod output;
pub mod reports;
pub mod table;
pub mod types;
pub mod util;

pub use config::LoadOptions;
pub use error::{Error, Result};
pub use metric::Metric;
pub use table::{EmissionsTable, Selection};
pub use types::EmissionsRecord;
