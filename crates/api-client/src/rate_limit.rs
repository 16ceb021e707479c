//! Client-side request throttling
//!
//! A token bucket per endpoint keeps the pipeline under the provider's
//! per-second quota. Requests wait for a token instead of failing.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::debug;

/// Rate limiter configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
    /// Burst allowance (extra requests allowed in short bursts)
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::per_second(25)
    }
}

impl RateLimitConfig {
    /// Per-second rate limit
    #[must_use]
    pub fn per_second(max: u32) -> Self {
        Self {
            max_requests: max,
            window: Duration::from_secs(1),
            burst: max / 2,
        }
    }

    fn refill_rate(&self) -> f64 {
        f64::from(self.max_requests) / self.window.as_secs_f64()
    }

    fn capacity(&self) -> f64 {
        f64::from(self.max_requests + self.burst)
    }
}

/// Token bucket state
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(config: &RateLimitConfig) -> Self {
        Self {
            tokens: config.capacity(),
            last_update: Instant::now(),
        }
    }

    fn refill(&mut self, config: &RateLimitConfig) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update);
        self.tokens = (self.tokens + elapsed.as_secs_f64() * config.refill_rate()).min(config.capacity());
        self.last_update = now;
    }

    /// Take a token, or report how long until one is available
    fn take(&mut self, config: &RateLimitConfig) -> Result<(), Duration> {
        self.refill(config);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            Err(Duration::from_secs_f64((1.0 - self.tokens) / config.refill_rate()))
        }
    }
}

/// Rate limiter with one bucket per endpoint key
#[derive(Debug)]
pub struct RateLimiter {
    buckets: Arc<RwLock<HashMap<String, TokenBucket>>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a new rate limiter
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            buckets: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Try to acquire a token for the given key without waiting
    #[must_use]
    pub fn try_acquire(&self, key: &str) -> bool {
        self.take(key).is_ok()
    }

    /// Acquire a token for the given key, sleeping until one is available
    pub fn acquire(&self, key: &str) {
        while let Err(wait) = self.take(key) {
            debug!(endpoint = key, wait_ms = wait.as_millis() as u64, "throttling request");
            std::thread::sleep(wait);
        }
    }

    fn take(&self, key: &str) -> Result<(), Duration> {
        // a poisoned lock still holds valid bucket state
        let mut buckets = self.buckets.write().unwrap_or_else(|e| e.into_inner());
        buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(&self.config))
            .take(&self.config)
    }
}
