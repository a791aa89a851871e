//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// The computation engine reports three families of failures; this type is
/// the outward face of all of them once they leave the core.
#[derive(Debug, Error)]
pub enum AppError {
    /// Tenant setup problem (bracket table, account mapping, taxes).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Caller input rejected before any computation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A computed result failed one of its own consistency checks.
    #[error("Invariant violation: {0}")]
    Invariant(String),

    /// I/O or decoding failure at the edges (files, stdin).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Configuration(_) => 3,
            Self::Invariant(_) => 4,
            Self::Internal(_) => 1,
        }
    }

    /// Returns the error code for machine-readable output.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Invariant(_) => "INVARIANT_VIOLATION",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
