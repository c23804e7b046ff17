//! Rate limiter implementation
//!
//! Fixed-window request counting per caller. A rejected request still counts
//! toward its window.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::RwLock;

use crate::config::RateLimitSettings;

/// Message returned to callers that overrun their window
pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Try again later.";

/// Fixed-window limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(5 * 60),
            max_requests: 10,
        }
    }
}

impl From<&RateLimitSettings> for RateLimitConfig {
    fn from(settings: &RateLimitSettings) -> Self {
        Self {
            window: Duration::from_secs(settings.window_secs),
            max_requests: settings.max_requests,
        }
    }
}

/// The caller has used up its window
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct RateLimited {
    pub message: String,
    pub limit: u32,
    /// Time until the current window closes
    pub retry_after: Duration,
}

/// Counter for one caller's current window
#[derive(Debug, Clone, Copy)]
struct RateWindow {
    window_start: Instant,
    count: u32,
}

/// In-process fixed-window rate limiter keyed by caller identity
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Arc<RwLock<HashMap<String, RateWindow>>>,
    /// Cleanup interval
    cleanup_interval: Duration,
    /// Last cleanup time
    last_cleanup: Arc<RwLock<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(RwLock::new(HashMap::new())),
            cleanup_interval: config.window.max(Duration::from_secs(60)),
            last_cleanup: Arc::new(RwLock::new(Instant::now())),
        }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Count a request from `caller_id` at `now`.
    ///
    /// Returns the allowance left in the window, or `RateLimited` once the
    /// count passes the configured maximum.
    pub async fn allow(&self, caller_id: &str, now: Instant) -> Result<u32, RateLimited> {
        self.maybe_cleanup(now).await;

        let mut windows = self.windows.write().await;
        let window = windows
            .entry(caller_id.to_string())
            .or_insert(RateWindow {
                window_start: now,
                count: 0,
            });

        if now.saturating_duration_since(window.window_start) >= self.config.window {
            window.window_start = now;
            window.count = 0;
        }

        window.count = window.count.saturating_add(1);

        if window.count > self.config.max_requests {
            let elapsed = now.saturating_duration_since(window.window_start);

            return Err(RateLimited {
                message: RATE_LIMIT_MESSAGE.to_string(),
                limit: self.config.max_requests,
                retry_after: self.config.window.saturating_sub(elapsed),
            });
        }

        Ok(self.config.max_requests - window.count)
    }

    /// Number of callers currently tracked
    pub async fn tracked_callers(&self) -> usize {
        self.windows.read().await.len()
    }

    async fn maybe_cleanup(&self, now: Instant) {
        let should_cleanup = {
            let last = self.last_cleanup.read().await;
            now.saturating_duration_since(*last) >= self.cleanup_interval
        };

        if should_cleanup {
            let mut last = self.last_cleanup.write().await;
            *last = now;

            let window = self.config.window;
            let mut windows = self.windows.write().await;

            windows.retain(|_, w| now.saturating_duration_since(w.window_start) < window);
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn limiter(max_requests: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            window: Duration::from_secs(window_secs),
            max_requests,
        })
    }

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();

        assert_eq!(config.window, Duration::from_secs(300));
        assert_eq!(config.max_requests, 10);
    }

    #[tokio::test]
    async fn test_first_request_opens_window() {
        let limiter = RateLimiter::default();

        let remaining = assert_ok!(limiter.allow("10.0.0.1", Instant::now()).await);

        assert_eq!(remaining, 9);
        assert_eq!(limiter.tracked_callers().await, 1);
    }

    #[tokio::test]
    async fn test_blocks_after_max_requests() {
        let limiter = limiter(10, 300);
        let start = Instant::now();

        for n in 1..=10 {
            let remaining = limiter.allow("10.0.0.1", start).await.unwrap();
            assert_eq!(remaining, 10 - n);
        }

        let err = limiter.allow("10.0.0.1", start).await.unwrap_err();
        assert_eq!(err.message, RATE_LIMIT_MESSAGE);
        assert_eq!(err.limit, 10);
        assert_eq!(err.retry_after, Duration::from_secs(300));
    }

    #[tokio::test]
    async fn test_rejected_requests_still_count() {
        let limiter = limiter(1, 60);
        let start = Instant::now();

        limiter.allow("a", start).await.unwrap();
        assert!(limiter.allow("a", start).await.is_err());
        assert!(limiter.allow("a", start + Duration::from_secs(30)).await.is_err());

        let err = limiter
            .allow("a", start + Duration::from_secs(45))
            .await
            .unwrap_err();
        assert_eq!(err.retry_after, Duration::from_secs(15));
    }

    #[tokio::test]
    async fn test_new_window_after_duration() {
        let limiter = limiter(2, 300);
        let start = Instant::now();

        limiter.allow("a", start).await.unwrap();
        limiter.allow("a", start).await.unwrap();
        assert!(limiter.allow("a", start).await.is_err());

        let later = start + Duration::from_secs(300);
        assert_eq!(limiter.allow("a", later).await.unwrap(), 1);
        assert_eq!(limiter.allow("a", later).await.unwrap(), 0);
        assert!(limiter.allow("a", later).await.is_err());
    }

    #[tokio::test]
    async fn test_window_is_fixed_not_sliding() {
        let limiter = limiter(2, 60);
        let start = Instant::now();

        limiter.allow("a", start).await.unwrap();
        limiter.allow("a", start + Duration::from_secs(59)).await.unwrap();

        // Window opened at `start`, so one second later the counter resets
        let remaining = limiter
            .allow("a", start + Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(remaining, 1);
    }

    #[tokio::test]
    async fn test_callers_are_independent() {
        let limiter = limiter(1, 60);
        let now = Instant::now();

        assert_ok!(limiter.allow("a", now).await);
        assert_err!(limiter.allow("a", now).await);
        assert_ok!(limiter.allow("b", now).await);
    }

    #[tokio::test]
    async fn test_cleanup_drops_expired_windows() {
        let limiter = limiter(5, 60);
        let start = Instant::now();

        limiter.allow("a", start).await.unwrap();
        limiter.allow("b", start).await.unwrap();

        let later = start + Duration::from_secs(120);
        limiter.allow("c", later).await.unwrap();

        assert_eq!(limiter.tracked_callers().await, 1);
    }

    #[tokio::test]
    async fn test_zero_max_rejects_everything() {
        let limiter = limiter(0, 60);

        assert!(limiter.allow("a", Instant::now()).await.is_err());
    }
}
