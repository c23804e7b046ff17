//! API Key entity

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// API key record as persisted in the key store
///
/// The key value is the only credential; `limit` is the number of calls the
/// key may still make. A record never goes below zero remaining calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    key: String,
    limit: i64,
}

impl ApiKey {
    /// Create a new API key record, rejecting a negative quota
    pub fn new(key: impl Into<String>, limit: i64) -> Result<Self, DomainError> {
        let key = key.into();

        if key.trim().is_empty() {
            return Err(DomainError::validation("API key cannot be empty"));
        }

        if limit < 0 {
            return Err(DomainError::validation(format!(
                "API key limit must be non-negative, got {}",
                limit
            )));
        }

        Ok(Self { key, limit })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Remaining calls
    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn has_quota(&self) -> bool {
        self.limit > 0
    }

    /// Take one call off the quota. Returns false, leaving the record
    /// untouched, when nothing is left.
    pub fn consume(&mut self) -> bool {
        if !self.has_quota() {
            return false;
        }

        self.limit -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_api_key() {
        let key = ApiKey::new("3b241101-e2bb-4255-8caf-4136c566a962", 100).unwrap();

        assert_eq!(key.key(), "3b241101-e2bb-4255-8caf-4136c566a962");
        assert_eq!(key.limit(), 100);
        assert!(key.has_quota());
    }

    #[test]
    fn test_negative_limit_rejected() {
        let result = ApiKey::new("abc", -1);
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(ApiKey::new("  ", 10).is_err());
    }

    #[test]
    fn test_consume_stops_at_zero() {
        let mut key = ApiKey::new("abc", 1).unwrap();

        assert!(key.consume());
        assert_eq!(key.limit(), 0);
        assert!(!key.has_quota());

        assert!(!key.consume());
        assert_eq!(key.limit(), 0);
    }

    #[test]
    fn test_serialized_shape() {
        let key = ApiKey::new("abc", 5).unwrap();
        let json = serde_json::to_value(&key).unwrap();

        assert_eq!(json, serde_json::json!({ "key": "abc", "limit": 5 }));
    }
}
