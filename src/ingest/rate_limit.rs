// src/ingest/rate_limit.rs
//! Fixed-delay scheduler for adapters that walk several URLs of one upstream.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Delay inserted between consecutive requests to the same kind of upstream.
pub const DEFAULT_FEED_DELAY_MS: u64 = 500;

/// Spaces calls at least `min_interval` apart.
///
/// Each caller reserves its slot while holding the lock and sleeps after
/// releasing it, so concurrent callers get distinct slots.
#[derive(Debug)]
pub struct RateLimiter {
    next_slot: Mutex<Option<Instant>>,
    min_interval: Duration,
    name: &'static str,
}

impl RateLimiter {
    pub fn new(min_interval: Duration, name: &'static str) -> Self {
        Self {
            next_slot: Mutex::new(None),
            min_interval,
            name,
        }
    }

    pub fn from_millis(ms: u64, name: &'static str) -> Self {
        Self::new(Duration::from_millis(ms), name)
    }

    /// Wait until this caller's slot. The first call returns immediately.
    pub async fn acquire(&self) {
        let now = Instant::now();
        let slot = {
            let mut next = self.next_slot.lock().await;
            let slot = match *next {
                Some(at) if at > now => at,
                _ => now,
            };
            *next = Some(slot + self.min_interval);
            slot
        };

        if slot > now {
            debug!(limiter = self.name, wait_ms = (slot - now).as_millis() as u64, "rate limiter wait");
            tokio::time::sleep_until(slot).await;
        }
    }
}
