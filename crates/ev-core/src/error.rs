use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors produced by the dashboard pipeline.
///
/// Non-fatal outcomes (empty selections, unmatched makers) are not errors;
/// see [`crate::models::PipelineWarning`].
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A source is missing one or more of the columns its dataset requires.
    #[error("Missing required column(s) in {path}: {}", missing.join(", "))]
    Schema {
        path: PathBuf,
        missing: Vec<String>,
    },

    /// A source could not be opened or is not parseable as CSV.
    #[error("Source unavailable {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A year or count cell holds a value that is not a non-negative integer.
    #[error("Invalid value {value:?} in {path} (row {row}, column {column})")]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },

    /// The caller asked for a year range whose lower bound exceeds its upper bound.
    #[error("Invalid year range: {min_year} > {max_year}")]
    InvalidRange { min_year: i32, max_year: i32 },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DashboardError {
    /// `true` for errors raised while loading a source (as opposed to
    /// rejected filter parameters).
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            DashboardError::Schema { .. }
                | DashboardError::SourceUnavailable { .. }
                | DashboardError::InvalidValue { .. }
        )
    }
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
