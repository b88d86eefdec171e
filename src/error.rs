use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for dataset and aggregation operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Errors raised by the load → filter → aggregate pipeline.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The source could not be opened or is structurally malformed.
    #[error("dataset {} is unavailable: {reason}", path.display())]
    DataUnavailable { path: PathBuf, reason: String },

    /// Required columns are absent from the header.
    #[error("dataset {} is missing required columns: {}", path.display(), missing.join(", "))]
    SchemaMismatch { path: PathBuf, missing: Vec<String> },

    /// A mean was requested over zero records.
    #[error("no records match the current filters")]
    EmptyAggregate,

    /// A range argument could not be parsed.
    #[error("invalid range: {0}")]
    InvalidRange(String),
}

impl DashboardError {
    pub(crate) fn unavailable(path: &Path, reason: impl ToString) -> Self {
        DashboardError::DataUnavailable {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
