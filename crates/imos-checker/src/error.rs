//! Error types for the IMOS checker.

use std::path::PathBuf;
use thiserror::Error;

/// A dataset that cannot be evaluated as written.
///
/// These are not convention violations: a rule that hits one of these is
/// reported as "could not be evaluated" while the other rules keep running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    /// A variable attribute names a variable that is not in the dataset.
    #[error("variable '{variable}' attribute '{attribute}' references unknown variable '{target}'")]
    UnresolvedReference {
        variable: String,
        attribute: String,
        target: String,
    },

    /// A variable holds no values where a reduction over its data is needed.
    #[error("variable '{variable}' has no data values")]
    EmptyData { variable: String },
}

/// Main error type for checker operations.
#[derive(Debug, Error)]
pub enum ImosError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A rule name that no registered suite provides.
    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    /// Malformed dataset.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Result type alias for checker operations.
pub type Result<T> = std::result::Result<T, ImosError>;
