//! API Key generation
//!
//! Keys are random (v4) UUIDs. The key value itself is the credential, so
//! there is no separate secret or hash to derive.

use uuid::Uuid;

/// Generator for API key values
#[derive(Debug, Clone, Default)]
pub struct ApiKeyGenerator;

impl ApiKeyGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a new key in hyphenated UUID form (122 random bits)
    pub fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
