// Error type for loading the dataset and writing reports.
//
// The metric engine never returns errors: missing data is expressed as an
// empty container or `None`. Only I/O at the edges of the crate can fail.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// File access errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing errors.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A column the loader cannot work without is absent from the header.
    #[error("missing required column `{column}` in {path}")]
    MissingColumn { column: &'static str, path: String },
}

pub type Result<T> = std::result::Result<T, Error>;
