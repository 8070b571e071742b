//! Bounded retry with exponential backoff.
//!
//! The policy is plain data; [`retrying`] applies it to any async operation.

use std::future::Future;

use studio_types::{config::RetryConfig, Result};

use crate::ports::DelayPort;

/// Fewest attempts a policy makes; a single try is not a retry.
pub const MIN_ATTEMPTS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(MIN_ATTEMPTS),
            base_delay_ms,
        }
    }

    /// Delay after the failed `attempt` (0-based): `base × 2^attempt`.
    pub fn backoff(&self, attempt: u32) -> u64 {
        self.base_delay_ms
            .saturating_mul(1u64 << attempt.min(20))
    }

    /// Whether another attempt follows the failed `attempt`.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryConfig::default().into()
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        Self::new(config.max_attempts, config.base_delay_ms)
    }
}

/// Run `op` until it succeeds or the policy is exhausted.
/// `op` receives the 0-based attempt number. The last error propagates.
pub async fn retrying<T, F, Fut>(
    policy: &RetryPolicy,
    delay: &dyn DelayPort,
    label: &str,
    mut op: F,
) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if policy.should_retry(attempt) => {
                let wait = policy.backoff(attempt);
                log::warn!(
                    "{} attempt {}/{} failed: {}. Retrying in {}ms",
                    label,
                    attempt + 1,
                    policy.max_attempts,
                    e,
                    wait
                );
                delay.sleep(wait).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
