//! A pure, synchronous backoff schedule for the reconnecting supervisor.
//!
//! Grounded in `examples/original_source/somfy/connector.py`'s
//! `BackoffPolicy.get_wait_time_sec_after_a_failure`: the first failure
//! since a success waits `0 s`; every failure after that waits
//! `min(max_wait, 2^(k-2))` seconds where `k` is the 1-based count of
//! failures since the last success. The source hardcodes the base of that
//! exponential to `1` and never actually reads its own `initial_wait` field
//! — here `initial_wait` is wired in as the real multiplier
//! (`initial_wait * 2^(k-2)`), which is a strict generalization: at the
//! source's own default (`initial_wait = 1`) the two formulas agree exactly.

use std::time::Duration;

use sdn_core::constants::{DEFAULT_INITIAL_WAIT_SECS, DEFAULT_MAX_WAIT_SECS};

/// `next_wait(k)` for `k` = number of consecutive failures since the last
/// success (1-based). Stateless: the supervisor owns the failure count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    initial_wait: Duration,
    max_wait: Duration,
}

impl BackoffPolicy {
    #[must_use]
    pub fn new(initial_wait: Duration, max_wait: Duration) -> Self {
        Self { initial_wait, max_wait }
    }

    /// `failures_since_success` is 1 for the first failure after a success
    /// (or since startup). Returns `0 s` for the first failure, and an
    /// exponentially growing, `max_wait`-capped duration afterward.
    #[must_use]
    pub fn next_wait(&self, failures_since_success: u32) -> Duration {
        if failures_since_success <= 1 {
            return Duration::ZERO;
        }
        let exponent = failures_since_success - 2;
        let multiplier = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
        let wait = self.initial_wait.saturating_mul(multiplier.try_into().unwrap_or(u32::MAX));
        wait.min(self.max_wait)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(DEFAULT_INITIAL_WAIT_SECS),
            Duration::from_secs(DEFAULT_MAX_WAIT_SECS),
        )
    }
}
