//! Dataset serving errors

use thiserror::Error;

use crate::domain::DomainError;

/// Failures while serving the dataset
#[derive(Debug, Error)]
pub enum DataError {
    /// The backing document is missing or malformed; terminal for the request
    #[error("Failed to load data from JSON: {0}")]
    SourceUnavailable(DomainError),

    /// The cache could not be read or written; callers degrade to the source
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(DomainError),
}
