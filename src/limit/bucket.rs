//! Token Bucket Module
//!
//! A token bucket with whole-second refill: credits accrue at a fixed rate
//! up to a cap, and each admitted request consumes one credit.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AdmissionError, Result};

// == Token Bucket ==
/// Tracks available credits for one caller and decides admit/reject.
///
/// Refill is computed in whole elapsed seconds; sub-second elapsed time
/// contributes nothing. A fresh bucket starts with `rate` tokens, not
/// `capacity`, so the maximum cold-start burst equals one second of refill.
#[derive(Debug)]
pub struct TokenBucket {
    /// Maximum tokens the bucket can hold
    capacity: u64,
    /// Tokens added per elapsed second
    rate: u64,
    /// Mutable counters, guarded by this bucket's own lock
    state: Mutex<BucketState>,
}

#[derive(Debug)]
struct BucketState {
    /// Tokens currently available; always within 0..=capacity
    tokens: u64,
    /// Unix seconds of the last refill computation
    last_refill: u64,
}

impl TokenBucket {
    // == Constructor ==
    /// Creates a bucket refilling `rate` tokens per second up to `capacity`.
    ///
    /// Zero `rate` or `capacity` is a programmer error and is rejected
    /// eagerly.
    pub fn new(rate: u64, capacity: u64) -> Result<Self> {
        if rate == 0 {
            return Err(AdmissionError::InvalidConfig(
                "limiter rate must be positive".to_string(),
            ));
        }
        if capacity == 0 {
            return Err(AdmissionError::InvalidConfig(
                "limiter capacity must be positive".to_string(),
            ));
        }
        Ok(Self::from_parts(rate, capacity))
    }

    /// Builds a bucket from parameters already validated by the caller.
    pub(crate) fn from_parts(rate: u64, capacity: u64) -> Self {
        Self {
            capacity,
            rate,
            state: Mutex::new(BucketState {
                // Warm start: one second's worth of refill, never more than
                // the bucket can hold.
                tokens: rate.min(capacity),
                last_refill: now_unix_secs(),
            }),
        }
    }

    // == Accept ==
    /// Decides whether one request is admitted, consuming a token if so.
    ///
    /// Refills first: elapsed whole seconds since the last refill times
    /// `rate`, clamped to `capacity`. A wall clock observed earlier than the
    /// last refill contributes nothing and leaves the refill mark in place.
    pub fn accept(&self) -> bool {
        let mut state = self.lock_state();
        let now = now_unix_secs();

        if now > state.last_refill {
            let elapsed = now - state.last_refill;
            state.tokens = state
                .tokens
                .saturating_add(elapsed.saturating_mul(self.rate))
                .min(self.capacity);
            state.last_refill = now;
        }

        if state.tokens > 0 {
            state.tokens -= 1;
            true
        } else {
            false
        }
    }

    // == Remaining ==
    /// Returns the tokens currently available, without refilling.
    pub fn remaining(&self) -> u64 {
        self.lock_state().tokens
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, BucketState> {
        // A poisoned lock only means another thread panicked mid-accept;
        // the counters themselves are always valid integers.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Moves the refill mark into the past, simulating elapsed time.
    #[cfg(test)]
    fn backdate(&self, secs: u64) {
        let mut state = self.lock_state();
        state.last_refill = state.last_refill.saturating_sub(secs);
    }
}

// == Utility Functions ==
/// Returns the current Unix timestamp in whole seconds.
fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_bucket_rejects_zero_rate() {
        let result = TokenBucket::new(0, 10);
        assert!(matches!(result, Err(AdmissionError::InvalidConfig(_))));
    }

    #[test]
    fn test_bucket_rejects_zero_capacity() {
        let result = TokenBucket::new(1, 0);
        assert!(matches!(result, Err(AdmissionError::InvalidConfig(_))));
    }

    #[test]
    fn test_warm_start_equals_rate() {
        // Initial burst is rate (2), not capacity (5)
        let bucket = TokenBucket::new(2, 5).unwrap();
        assert_eq!(bucket.remaining(), 2);
    }

    #[test]
    fn test_warm_start_clamped_to_capacity() {
        let bucket = TokenBucket::new(10, 3).unwrap();
        assert_eq!(bucket.remaining(), 3);
    }

    #[test]
    fn test_accept_consumes_one_token() {
        let bucket = TokenBucket::new(3, 10).unwrap();

        assert!(bucket.accept());
        assert!(bucket.accept());
        assert!(bucket.accept());
        // Fourth call finds the bucket empty (no second has elapsed)
        assert!(!bucket.accept());
        assert_eq!(bucket.remaining(), 0);
    }

    #[test]
    fn test_burst_then_refill() {
        let bucket = TokenBucket::new(1, 1).unwrap();

        assert!(bucket.accept());
        assert!(!bucket.accept());

        // Crossing at least one second boundary refills one token
        sleep(Duration::from_millis(1100));
        assert!(bucket.accept());
    }

    #[test]
    fn test_refill_clamps_to_capacity() {
        let bucket = TokenBucket::new(4, 6).unwrap();

        // Ten simulated seconds would add 40 tokens; the cap holds at 6
        bucket.backdate(10);
        assert!(bucket.accept());
        assert_eq!(bucket.remaining(), 5);
    }

    #[test]
    fn test_refill_accrues_per_whole_second() {
        let bucket = TokenBucket::new(2, 10).unwrap();

        while bucket.accept() {}
        assert_eq!(bucket.remaining(), 0);

        bucket.backdate(3);
        assert!(bucket.accept());
        // 3 s x 2 tokens/s = 6, minus the one just consumed
        assert_eq!(bucket.remaining(), 5);
    }

    #[test]
    fn test_tokens_stay_within_bounds() {
        let bucket = TokenBucket::new(3, 3).unwrap();

        for _ in 0..20 {
            bucket.accept();
            let remaining = bucket.remaining();
            assert!(remaining <= 3, "tokens exceeded capacity: {}", remaining);
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            // Tokens stay within 0..=capacity for any accept sequence and
            // any simulated elapsed time.
            #[test]
            fn prop_tokens_bounded(
                rate in 1u64..50,
                capacity in 1u64..50,
                steps in prop::collection::vec((0u64..5, 0usize..4), 1..30)
            ) {
                let bucket = TokenBucket::new(rate, capacity).unwrap();
                prop_assert!(bucket.remaining() <= capacity);

                for (elapsed, accepts) in steps {
                    bucket.backdate(elapsed);
                    for _ in 0..accepts {
                        bucket.accept();
                        prop_assert!(
                            bucket.remaining() <= capacity,
                            "tokens exceeded capacity"
                        );
                    }
                }
            }

            // An empty bucket admits exactly rate * elapsed requests (up to
            // capacity) after a quiet period.
            #[test]
            fn prop_refill_matches_elapsed(
                rate in 1u64..10,
                capacity in 1u64..20,
                elapsed in 1u64..10
            ) {
                let bucket = TokenBucket::new(rate, capacity).unwrap();
                while bucket.accept() {}

                bucket.backdate(elapsed);
                let mut admitted = 0u64;
                while bucket.accept() {
                    admitted += 1;
                }

                prop_assert_eq!(admitted, (rate * elapsed).min(capacity));
            }
        }
    }

    #[test]
    fn test_accept_is_atomic_across_threads() {
        use std::sync::Arc;

        let bucket = Arc::new(TokenBucket::new(5, 5).unwrap());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let bucket = Arc::clone(&bucket);
            handles.push(std::thread::spawn(move || {
                let mut admitted = 0u64;
                for _ in 0..4 {
                    if bucket.accept() {
                        admitted += 1;
                    }
                }
                admitted
            }));
        }

        let admitted: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        // 32 attempts against 5 warm tokens; refill can add at most a few
        // seconds' worth while the threads run
        assert!(admitted >= 5);
        assert!(admitted <= 15);
        assert!(bucket.remaining() <= 5);
    }
}
