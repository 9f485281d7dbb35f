//! Minimum-interval rate limiting for oracle calls

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum interval between successive oracle calls
///
/// The oracle providers impose throughput caps, so the interval is global
/// across however many workers share the limiter: clones share state, and
/// each `acquire` reserves the next send slot. Callers may parallelize
/// freely; the limiter serializes only the dispatch times.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Duration,
    next_slot: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    /// Create a limiter with the given minimum inter-call interval
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Wait until the next call may be dispatched
    pub async fn acquire(&self) {
        let wait_until = {
            let mut slot = self.next_slot.lock().await;
            let now = Instant::now();
            let ready_at = match *slot {
                Some(at) if at > now => at,
                _ => now,
            };
            *slot = Some(ready_at + self.min_interval);
            ready_at
        };

        tokio::time::sleep_until(wait_until).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_acquire_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_secs(10));
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_acquire_waits_out_the_interval() {
        let limiter = RateLimiter::new(Duration::from_secs(2));
        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clones_share_the_interval() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        let clone = limiter.clone();

        let start = Instant::now();
        limiter.acquire().await;
        clone.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }
}
