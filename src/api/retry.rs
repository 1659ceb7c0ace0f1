use std::time::Duration;

use super::OverpassError;

/// Retry schedule for Overpass requests.
///
/// Attempt `n` (1-based) is followed, on a transient failure, by a wait of
/// `base_delay * 2^(n-1)` before attempt `n + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Wait before the attempt following `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Run `op` until it succeeds, fails with a non-transient error, or the
/// attempt budget is spent. The last error is returned unchanged.
pub fn with_retry<T, F, S>(policy: &RetryPolicy, mut sleep: S, mut op: F) -> Result<T, OverpassError>
where
    F: FnMut(u32) -> Result<T, OverpassError>,
    S: FnMut(Duration),
{
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < policy.max_attempts => {
                let wait = policy.delay_after(attempt);
                tracing::warn!(
                    "Request failed, retrying in {}s (attempt {}/{}): {}",
                    wait.as_secs(),
                    attempt + 1,
                    policy.max_attempts,
                    e
                );
                sleep(wait);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
