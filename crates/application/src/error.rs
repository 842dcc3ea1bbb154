//! Application error types

use pulse_domain::DomainError;
use thiserror::Error;

/// Application-level errors.
///
/// Request failures never show up here; they are carried as
/// [`pulse_domain::Outcome::Failure`] and turned into step reports.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The suite cannot be assembled from the given parts.
    #[error("invalid suite: {0}")]
    InvalidSuite(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
