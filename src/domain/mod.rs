//! Domain layer - Core entities, errors and collaborator contracts

pub mod api_key;
pub mod cache;
pub mod dataset;
pub mod error;

pub use api_key::{ApiKey, AuthError, KeyStore, PersistenceError};
pub use cache::{Cache, CacheExt};
pub use dataset::{DataError, DataSource, Dataset};
pub use error::DomainError;
