//! Errors of the job runner.

use thiserror::Error;

/// Errors that can occur while loading, running or saving jobs.
#[derive(Debug, Error)]
pub enum BenchError {
    /// File system error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed job or report JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Job file that parses but cannot be packed.
    #[error("Invalid job '{name}': {reason}")]
    InvalidJob { name: String, reason: String },

    /// Unknown built-in scenario.
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),
}
