use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Outcome of a rate-limit check
#[derive(Debug, Clone, Copy)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Seconds until the window resets; 0 when allowed
    pub retry_after_secs: u64,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Stale entries are dropped once the map grows past this many clients
const PRUNE_THRESHOLD: usize = 1024;

/// Fixed-window request limiter keyed by client address
///
/// Each client gets `max_requests` per window; the first request after
/// the window elapses starts a fresh one. State lives in process memory,
/// so limits reset on restart and are per-instance.
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    clients: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Count a request from `client` against its current window
    pub fn check(&self, client: &str) -> RateLimitDecision {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> RateLimitDecision {
        let mut clients = self
            .clients
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if clients.len() > PRUNE_THRESHOLD {
            let window = self.window;
            clients.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = clients.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        if entry.count < self.max_requests {
            entry.count += 1;
            RateLimitDecision {
                allowed: true,
                retry_after_secs: 0,
            }
        } else {
            let remaining = self.window.saturating_sub(now.duration_since(entry.started));
            RateLimitDecision {
                allowed: false,
                retry_after_secs: remaining.as_secs().max(1),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_enforced_within_window() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let t0 = Instant::now();

        for _ in 0..3 {
            assert!(limiter.check_at("10.0.0.1", t0).allowed);
        }

        let denied = limiter.check_at("10.0.0.1", t0);
        assert!(!denied.allowed);
        assert!(denied.retry_after_secs >= 1);
        assert!(denied.retry_after_secs <= 60);
    }

    #[test]
    fn test_window_resets_after_elapsing() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let t0 = Instant::now();

        assert!(limiter.check_at("10.0.0.1", t0).allowed);
        assert!(!limiter.check_at("10.0.0.1", t0).allowed);

        let later = t0 + Duration::from_secs(61);
        assert!(limiter.check_at("10.0.0.1", later).allowed);
    }

    #[test]
    fn test_clients_counted_independently() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let t0 = Instant::now();

        assert!(limiter.check_at("10.0.0.1", t0).allowed);
        assert!(!limiter.check_at("10.0.0.1", t0).allowed);
        assert!(limiter.check_at("10.0.0.2", t0).allowed);
    }

    #[test]
    fn test_stale_clients_are_pruned() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let t0 = Instant::now();

        for i in 0..=PRUNE_THRESHOLD {
            limiter.check_at(&format!("10.0.{}.{}", i / 256, i % 256), t0);
        }
        assert!(limiter.clients.lock().unwrap().len() > PRUNE_THRESHOLD);

        let later = t0 + Duration::from_secs(120);
        limiter.check_at("10.9.9.9", later);
        assert_eq!(limiter.clients.lock().unwrap().len(), 1);
    }
}
