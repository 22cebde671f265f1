//! Rate limiting implementation
//!
//! Rolling-window limiter: a request may start once fewer than
//! `requests_per_minute` requests started within the last window.
//! The window bookkeeping sits behind a short synchronous critical
//! section; waiting happens outside of it on the tokio timer.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Default outbound budget for the XML API
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 30;

/// Configuration for rate limiting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Maximum number of requests per window
    pub requests_per_minute: u32,
    /// Length of the rolling window
    pub window: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::per_minute(DEFAULT_REQUESTS_PER_MINUTE)
    }
}

impl RateLimiterConfig {
    /// Create a config allowing `requests_per_minute` per 60 second window
    pub fn per_minute(requests_per_minute: u32) -> Self {
        Self {
            requests_per_minute,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Debug)]
struct Window {
    limit: usize,
    length: Duration,
    starts: VecDeque<Instant>,
}

impl Window {
    fn evict(&mut self, now: Instant) {
        while let Some(&oldest) = self.starts.front() {
            if now.duration_since(oldest) >= self.length {
                self.starts.pop_front();
            } else {
                break;
            }
        }
    }

    /// Record a request start, or return the instant at which to try again
    fn try_record(&mut self, now: Instant) -> Result<(), Instant> {
        self.evict(now);
        if self.starts.len() < self.limit {
            self.starts.push_back(now);
            return Ok(());
        }
        // limit >= 1, so the queue is non-empty here
        let oldest = self.starts.front().copied().unwrap_or(now);
        Err(oldest + self.length)
    }
}

/// Rolling-window rate limiter shared by every fetch through one client
#[derive(Clone)]
pub struct RateLimiter {
    window: Arc<Mutex<Window>>,
    config: RateLimiterConfig,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        let limit = config.requests_per_minute.max(1) as usize;
        Self {
            window: Arc::new(Mutex::new(Window {
                limit,
                length: config.window,
                starts: VecDeque::with_capacity(limit),
            })),
            config: config.clone(),
        }
    }

    /// Create a limiter allowing `requests_per_minute` per minute
    pub fn per_minute(requests_per_minute: u32) -> Self {
        Self::new(&RateLimiterConfig::per_minute(requests_per_minute))
    }

    /// The limiter configuration
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Wait until one more request fits the budget, then record it
    pub async fn acquire(&self) {
        loop {
            let retry_at = match self.lock().try_record(Instant::now()) {
                Ok(()) => return,
                Err(retry_at) => retry_at,
            };
            tracing::debug!(
                wait_ms = retry_at.saturating_duration_since(Instant::now()).as_millis() as u64,
                "Rate limit reached, waiting"
            );
            tokio::time::sleep_until(retry_at).await;
        }
    }

    /// Record a request if it fits the budget right now
    pub fn try_acquire(&self) -> bool {
        self.lock().try_record(Instant::now()).is_ok()
    }

    /// Number of request starts inside the current window
    pub fn recent_requests(&self) -> usize {
        let mut window = self.lock();
        window.evict(Instant::now());
        window.starts.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Window> {
        self.window.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(&RateLimiterConfig::default())
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod rate_limit_tests {
    use super::*;

    #[test]
    fn test_rate_limiter_config_default() {
        let config = RateLimiterConfig::default();
        assert_eq!(config.requests_per_minute, DEFAULT_REQUESTS_PER_MINUTE);
        assert_eq!(config.window, Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_allows_budget_immediately() {
        let limiter = RateLimiter::per_minute(5);
        for _ in 0..5 {
            assert!(limiter.try_acquire());
        }
        assert!(!limiter.try_acquire());
        assert_eq!(limiter.recent_requests(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_waits_for_window() {
        let limiter = RateLimiter::per_minute(2);
        let start = Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_window_rolls() {
        let limiter = RateLimiter::per_minute(1);
        limiter.acquire().await;

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(!limiter.try_acquire());

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(limiter.try_acquire());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_budget_holds_across_tasks() {
        let rpm = 5usize;
        let limiter = RateLimiter::per_minute(rpm as u32);
        let stamps = Arc::new(Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for _ in 0..17 {
            let limiter = limiter.clone();
            let stamps = Arc::clone(&stamps);
            handles.push(tokio::spawn(async move {
                limiter.acquire().await;
                stamps.lock().unwrap().push(Instant::now());
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut stamps = stamps.lock().unwrap().clone();
        stamps.sort();
        assert_eq!(stamps.len(), 17);
        // Any rpm + 1 consecutive starts span at least one full window
        for pair in stamps.windows(rpm + 1) {
            assert!(pair[rpm].duration_since(pair[0]) >= Duration::from_secs(60));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_acquire_pending_until_slot_frees() {
        let limiter = RateLimiter::per_minute(1);
        assert!(limiter.try_acquire());

        let mut waiting = tokio_test::task::spawn(limiter.acquire());
        tokio_test::assert_pending!(waiting.poll());

        tokio::time::advance(Duration::from_secs(59)).await;
        tokio_test::assert_pending!(waiting.poll());

        tokio::time::advance(Duration::from_secs(1)).await;
        tokio_test::assert_ready!(waiting.poll());
        assert_eq!(limiter.recent_requests(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_zero_budget_treated_as_one() {
        let limiter = RateLimiter::per_minute(0);
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }
}
