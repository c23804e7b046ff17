//! JSON file data source

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::domain::dataset::{DataSource, Dataset};
use crate::domain::DomainError;

/// Reads the dataset from a JSON file on every load
#[derive(Debug, Clone)]
pub struct FileDataSource {
    path: PathBuf,
}

impl FileDataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DataSource for FileDataSource {
    async fn load(&self) -> Result<Dataset, DomainError> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            error!(path = %self.path.display(), error = %e, "Error reading dataset file");
            DomainError::data_source(format!("{}: {}", self.path.display(), e))
        })?;

        let document: serde_json::Value = serde_json::from_str(&contents).map_err(|e| {
            error!(path = %self.path.display(), error = %e, "Dataset file is not valid JSON");
            DomainError::data_source(format!("{}: {}", self.path.display(), e))
        })?;

        debug!(path = %self.path.display(), bytes = contents.len(), "Dataset loaded from file");

        Ok(Dataset::new(document))
    }
}
