//! Errors raised while admitting or issuing API keys

use thiserror::Error;

use crate::domain::DomainError;

/// Reasons a presented API key is not admitted
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("API key required")]
    MissingKey,

    #[error("Invalid API key")]
    InvalidKey,

    #[error("API limit exhausted. Upgrade your plan or try later.")]
    QuotaExhausted,

    /// The key store could not be reached; quota has no other source of truth
    #[error("Key store unavailable: {0}")]
    Store(#[from] DomainError),
}

/// A newly issued key could not be saved
#[derive(Debug, Error)]
#[error("Failed to persist API key: {source}")]
pub struct PersistenceError {
    #[from]
    pub source: DomainError,
}
