//! Process-local cache backed by moka

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use moka::Expiry;

use crate::domain::cache::Cache;
use crate::domain::DomainError;

/// Longest TTL honoured; larger values are clamped
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Entries held before moka starts evicting
    pub max_capacity: u64,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

impl InMemoryCacheConfig {
    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }
}

#[derive(Debug, Clone)]
struct Slot {
    value: String,
    ttl: Duration,
    /// `None` when the deadline is past what `Instant` can represent
    deadline: Option<Instant>,
}

impl Slot {
    fn live_at(&self, now: Instant) -> bool {
        self.deadline.is_none_or(|deadline| now < deadline)
    }
}

/// Lets moka evict each slot on its own TTL; every write re-arms it
struct SlotExpiry;

impl Expiry<String, Slot> for SlotExpiry {
    fn expire_after_create(&self, _key: &String, slot: &Slot, _at: Instant) -> Option<Duration> {
        Some(slot.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        slot: &Slot,
        _at: Instant,
        _remaining: Option<Duration>,
    ) -> Option<Duration> {
        Some(slot.ttl)
    }
}

/// Cache that lives and dies with the process
///
/// moka evicts lazily, so reads also compare against the slot's own deadline.
#[derive(Debug)]
pub struct InMemoryCache {
    slots: MokaCache<String, Slot>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        Self {
            slots: MokaCache::builder()
                .max_capacity(config.max_capacity)
                .expire_after(SlotExpiry)
                .build(),
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let Some(slot) = self.slots.get(key).await else {
            return Ok(None);
        };

        if slot.live_at(Instant::now()) {
            Ok(Some(slot.value))
        } else {
            self.slots.invalidate(key).await;
            Ok(None)
        }
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), DomainError> {
        let ttl = ttl.min(MAX_TTL);
        let slot = Slot {
            value: value.to_string(),
            ttl,
            deadline: Instant::now().checked_add(ttl),
        };

        self.slots.insert(key.to_string(), slot).await;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "In-memory cache"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::CacheExt;

    #[tokio::test]
    async fn test_round_trip() {
        let cache = InMemoryCache::new();

        cache
            .set_json("greeting", &"hello", Duration::from_secs(60))
            .await
            .unwrap();

        let value: Option<String> = cache.get_json("greeting").await.unwrap();
        assert_eq!(value.as_deref(), Some("hello"));
        assert!(cache.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_entry_expires() {
        let cache = InMemoryCache::new();

        cache
            .set_with_expiry("short", "1", Duration::from_millis(50))
            .await
            .unwrap();
        assert_eq!(cache.get("short").await.unwrap().as_deref(), Some("1"));

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(cache.get("short").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overwrite_rearms_expiry() {
        let cache = InMemoryCache::new();

        cache
            .set_with_expiry("key", "1", Duration::from_millis(50))
            .await
            .unwrap();
        cache
            .set_with_expiry("key", "2", Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(cache.get("key").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_unbounded_ttl_is_clamped() {
        let cache = InMemoryCache::new();

        cache
            .set_with_expiry("forever", "1", Duration::from_secs(u64::MAX))
            .await
            .unwrap();

        assert_eq!(cache.get("forever").await.unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_slot_deadline() {
        let now = Instant::now();
        let slot = Slot {
            value: "v".to_string(),
            ttl: Duration::from_secs(1800),
            deadline: now.checked_add(Duration::from_secs(1800)),
        };

        assert!(slot.live_at(now));
        assert!(!slot.live_at(now + Duration::from_secs(1800)));

        let unbounded = Slot { deadline: None, ..slot };
        assert!(unbounded.live_at(now + Duration::from_secs(1800)));
    }
}
