//! Error types for U-Guillotine.

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result type alias for U-Guillotine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during packing.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid box provided.
    #[error("Invalid box: {0}")]
    InvalidGeometry(String),

    /// Invalid bin provided.
    #[error("Invalid bin: {0}")]
    InvalidBoundary(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Neither explicit bins nor a base bin size were given.
    #[error("No usable bin size given")]
    NoBin,

    /// Every heuristic run placed zero boxes.
    #[error("No placement possible for the given boxes")]
    NoPlacementPossible,

    /// Every heuristic run failed internally.
    #[error("All packing runs failed: {0}")]
    BadError(String),

    /// Computation cancelled.
    #[error("Computation cancelled")]
    Cancelled,

    /// Timeout exceeded.
    #[error("Timeout exceeded after {0}ms")]
    Timeout(u64),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse outcome code reported to callers outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ErrorCode {
    /// Packing succeeded.
    None,
    /// No usable bin size given.
    NoBin,
    /// Every run placed zero boxes.
    NoPlacementPossible,
    /// Internal failure.
    BadError,
}

impl Error {
    /// Maps this error onto the external error code.
    ///
    /// Input validation errors report `NoBin` when they concern bin geometry,
    /// everything unexpected reports `BadError`.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NoBin | Self::InvalidBoundary(_) => ErrorCode::NoBin,
            Self::NoPlacementPossible => ErrorCode::NoPlacementPossible,
            Self::InvalidGeometry(_)
            | Self::ConfigError(_)
            | Self::BadError(_)
            | Self::Cancelled
            | Self::Timeout(_)
            | Self::Internal(_) => ErrorCode::BadError,
        }
    }

    /// Returns true for errors raised by a single run's internals
    /// (as opposed to input errors or interruption).
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_) | Self::BadError(_))
    }
}

impl<T> From<&Result<T>> for ErrorCode {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => ErrorCode::None,
            Err(e) => e.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::NoBin.code(), ErrorCode::NoBin);
        assert_eq!(
            Error::NoPlacementPossible.code(),
            ErrorCode::NoPlacementPossible
        );
        assert_eq!(Error::Internal("x".into()).code(), ErrorCode::BadError);
        assert_eq!(Error::Timeout(10).code(), ErrorCode::BadError);
    }

    #[test]
    fn test_code_from_result() {
        let ok: Result<u8> = Ok(1);
        let err: Result<u8> = Err(Error::NoBin);
        assert_eq!(ErrorCode::from(&ok), ErrorCode::None);
        assert_eq!(ErrorCode::from(&err), ErrorCode::NoBin);
    }

    #[test]
    fn test_display() {
        assert_eq!(Error::Timeout(250).to_string(), "Timeout exceeded after 250ms");
        assert!(Error::Internal("bad".into()).is_internal());
        assert!(!Error::Cancelled.is_internal());
    }
}
