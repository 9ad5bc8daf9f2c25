use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the loader, the filters and the statistics.
#[derive(Debug, Error)]
pub enum StatsError {
    /// The city is not one of the known datasets.
    #[error("no dataset for city '{city}'")]
    DatasetNotFound { city: String },

    /// A row (or the header) could not be turned into a trip record.
    /// The whole load is aborted.
    #[error("line {line}, column '{column}': {reason} (value: '{value}')")]
    MalformedRecord {
        line: u64,
        column: &'static str,
        value: String,
        reason: String,
    },

    /// A statistic that needs at least one value was computed over none.
    #[error("no data for {statistic}")]
    NoData { statistic: &'static str },

    /// The dataset has no such column at all.
    #[error("dataset has no '{column}' column")]
    MissingColumn { column: &'static str },

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T, E = StatsError> = std::result::Result<T, E>;
