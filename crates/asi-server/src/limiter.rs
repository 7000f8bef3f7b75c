//! Per-client fixed-window rate limiter.
//!
//! Each key owns a window that opens on its first request and grants
//! `points` admissions. A window older than `window` is replaced lazily on
//! the next request for that key; a background sweep evicts idle windows so
//! the map does not grow with every client ever seen.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Rate limit policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LimiterConfig {
    /// Admissions per window.
    pub points: u32,
    /// Window length.
    pub window: Duration,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            points: 100,
            window: Duration::from_secs(60),
        }
    }
}

/// Outcome of [`RateLimiter::consume`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// The request may proceed.
    Admitted {
        /// Points left in the current window.
        remaining: u32,
    },
    /// The key has exhausted its window.
    Rejected {
        /// Time until the window resets.
        retry_after: Duration,
    },
}

impl Admission {
    /// Whether the request was admitted.
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }
}

#[derive(Debug)]
struct Window {
    started: Instant,
    remaining: u32,
}

/// Keyed rate limiter shared by the HTTP and channel surfaces.
#[derive(Debug)]
pub struct RateLimiter {
    config: LimiterConfig,
    windows: DashMap<String, Window>,
}

impl RateLimiter {
    /// Create a limiter with the given policy.
    pub fn new(config: LimiterConfig) -> Self {
        Self {
            config,
            windows: DashMap::new(),
        }
    }

    /// Active policy.
    pub fn config(&self) -> LimiterConfig {
        self.config
    }

    /// Take one point for `key`.
    ///
    /// Check and decrement happen under the key's shard lock, so concurrent
    /// callers for the same key never admit more than `points` per window.
    pub fn consume(&self, key: &str) -> Admission {
        let now = Instant::now();
        let mut window = self
            .windows
            .entry(key.to_owned())
            .or_insert_with(|| Window {
                started: now,
                remaining: self.config.points,
            });

        if now.duration_since(window.started) >= self.config.window {
            window.started = now;
            window.remaining = self.config.points;
        }

        if window.remaining == 0 {
            let retry_after = self
                .config
                .window
                .saturating_sub(now.duration_since(window.started));
            return Admission::Rejected { retry_after };
        }

        window.remaining -= 1;
        Admission::Admitted {
            remaining: window.remaining,
        }
    }

    /// Drop windows that have fully elapsed. Returns how many were evicted.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.windows.len();
        self.windows
            .retain(|_, w| now.duration_since(w.started) < self.config.window);
        before.saturating_sub(self.windows.len())
    }

    /// Number of keys with a live window.
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }

    /// Run [`purge_expired`](Self::purge_expired) every `interval` until cancelled.
    pub fn spawn_sweeper(
        self: Arc<Self>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // First tick completes immediately.
            let _ = ticker.tick().await;
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let evicted = self.purge_expired();
                        if evicted > 0 {
                            debug!(evicted, tracked = self.tracked_keys(), "rate limit sweep");
                        }
                    }
                }
            }
        })
    }
}

/// Whole seconds for a `Retry-After` hint, rounded up and at least 1.
pub fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}
