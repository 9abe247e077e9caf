//! Error types for the GRASP solver.
//!
//! Every fallible operation in the crate returns [`Result<T>`]. Input and
//! configuration problems are reported before any search work starts.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, GraspError>;

#[derive(Debug, Error)]
pub enum GraspError {
    /// A tour needs at least two distinct points to have edges.
    #[error("instance must contain at least 2 cities, found {found}")]
    TooFewCities { found: usize },

    #[error("city {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A city sequence that is not a valid (sub-)permutation of the instance.
    #[error("invalid tour: {0}")]
    InvalidTour(String),

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
