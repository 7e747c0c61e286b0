//! Fixed-window request rate limiting, keyed per client.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

struct Window {
    started_at: Instant,
    count: u32,
}

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy)]
pub struct RateDecision {
    pub allowed: bool,
    /// Requests left in the current window.
    pub remaining: u32,
    /// Seconds until the window resets.
    pub reset_secs: u64,
}

/// Per-client fixed-window limiter. Buckets are keyed by identity and
/// request category, so different categories draw on separate budgets.
pub struct RateLimiter {
    inner: Mutex<HashMap<String, Window>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    /// Record a request for `identity` in `category` and decide whether
    /// it may proceed.
    pub fn check(&self, identity: &str, category: &str) -> RateDecision {
        let mut inner = self.inner.lock();
        let now = Instant::now();

        let entry = inner
            .entry(format!("{}:{}", category, identity))
            .or_insert(Window {
                started_at: now,
                count: 0,
            });

        if now.duration_since(entry.started_at) >= self.window {
            entry.started_at = now;
            entry.count = 0;
        }

        let elapsed = now.duration_since(entry.started_at);
        let reset_secs = self.window.saturating_sub(elapsed).as_secs();

        if entry.count >= self.max_requests {
            return RateDecision {
                allowed: false,
                remaining: 0,
                reset_secs,
            };
        }

        entry.count += 1;
        RateDecision {
            allowed: true,
            remaining: self.max_requests - entry.count,
            reset_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        assert!(limiter.check("a", "ask").allowed);
        assert!(limiter.check("a", "ask").allowed);
        let third = limiter.check("a", "ask");
        assert!(third.allowed);
        assert_eq!(third.remaining, 0);
        assert!(!limiter.check("a", "ask").allowed);
    }

    #[test]
    fn test_identities_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check("a", "ask").allowed);
        assert!(!limiter.check("a", "ask").allowed);
        assert!(limiter.check("b", "ask").allowed);
    }

    #[test]
    fn test_categories_draw_on_separate_budgets() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check("a", "ask").allowed);
        assert!(!limiter.check("a", "ask").allowed);
        assert!(limiter.check("a", "config").allowed);
    }

    #[test]
    fn test_window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_millis(5));
        assert!(limiter.check("a", "ask").allowed);
        assert!(!limiter.check("a", "ask").allowed);
        std::thread::sleep(Duration::from_millis(10));
        assert!(limiter.check("a", "ask").allowed);
    }
}
