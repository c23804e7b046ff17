//! Dataset entity

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The canonical document served to admitted callers
///
/// Held as parsed JSON so the copy read back from the cache and the copy
/// loaded from the source serialize to the same bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset(Value);

impl Dataset {
    pub fn new(document: Value) -> Self {
        Self(document)
    }

    pub fn document(&self) -> &Value {
        &self.0
    }
}
