//! Request pacing and retry for the remote APIs.

use std::{future::Future, time::Duration};

use tokio::{sync::Mutex, time::Instant};

use crate::internal::ai::generation::GenerationError;

pub const DEFAULT_RATE_LIMIT_QPS: f64 = 0.5;
pub const MAX_RETRIES: u32 = 3;

/// Spaces request starts at least `interval` apart, across tasks.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// `qps` requests per second; values at or below zero are clamped to a
    /// very slow but finite rate.
    pub fn per_second(qps: f64) -> Self {
        Self {
            interval: interval_for(qps),
            next_slot: Mutex::new(None),
        }
    }

    pub fn unlimited() -> Self {
        Self {
            interval: Duration::ZERO,
            next_slot: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits for the next free slot and claims it.
    pub async fn acquire(&self) {
        if self.interval.is_zero() {
            return;
        }
        let wait_until = {
            let mut slot = self.next_slot.lock().await;
            let now = Instant::now();
            let start = match *slot {
                Some(next) if next > now => next,
                _ => now,
            };
            *slot = Some(start + self.interval);
            start
        };
        tokio::time::sleep_until(wait_until).await;
    }
}

/// `1 / qps` with a floor on qps of 1e-6.
pub fn interval_for(qps: f64) -> Duration {
    let qps = if qps.is_finite() { qps.max(1e-6) } else { 1e-6 };
    Duration::from_secs_f64(1.0 / qps)
}

/// Linear backoff retry for retryable [`GenerationError`]s.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Sleep before attempt `n + 1` is `base_delay * n`.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, GenerationError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, GenerationError>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(v) => return Ok(v),
                Err(e) if attempt < self.max_attempts && e.is_retryable() => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        "request failed, retrying: {}",
                        e
                    );
                    tokio::time::sleep(self.base_delay * attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[test]
    fn test_interval_for() {
        assert_eq!(interval_for(0.5), Duration::from_secs(2));
        assert_eq!(interval_for(4.0), Duration::from_millis(250));
        assert!(interval_for(0.0) >= Duration::from_secs(999_999));
        assert!(interval_for(f64::NAN) >= Duration::from_secs(999_999));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_spaces_requests() {
        let limiter = RateLimiter::per_second(2.0);
        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers_from_transient_errors() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::from_secs(1));
        let start = Instant::now();

        let out = policy
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Err(GenerationError::NoImage)
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(out, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 1s after the first failure, 2s after the second.
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_requests_are_not_retried() {
        let calls = AtomicU32::new(0);
        let err = RetryPolicy::new(3, Duration::from_secs(1))
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err::<(), _>(GenerationError::Rejected {
                        status: 400,
                        message: "resolution is not supported".into(),
                    })
                }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Rejected { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let err = RetryPolicy::new(2, Duration::ZERO)
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(GenerationError::NoImage) }
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::NoImage));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
