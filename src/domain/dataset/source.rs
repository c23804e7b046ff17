//! Dataset source trait

use async_trait::async_trait;

use super::entity::Dataset;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Loads the canonical dataset from static storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Reads and parses the whole document
    async fn load(&self) -> Result<Dataset, DomainError>;
}
