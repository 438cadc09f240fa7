use std::fmt::Display;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Wait schedule between failed attempts.
///
/// Makes `base_delays.len() + final_retries` attempts, at least one. The
/// wait after failed attempt `n` is `base_delays[n - 1]`, or `final_delay`
/// once `base_delays` runs out. No wait follows the last attempt, so
/// `final_delay` only applies when `final_retries` is two or more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub base_delays: Vec<Duration>,
    pub final_retries: usize,
    pub final_delay: Duration,
}

impl RetryPolicy {
    /// A single attempt, no retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            base_delays: Vec::new(),
            final_retries: 0,
            final_delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn from_secs(base_delays: &[u64], final_retries: usize, final_delay: u64) -> Self {
        Self {
            base_delays: base_delays.iter().copied().map(Duration::from_secs).collect(),
            final_retries,
            final_delay: Duration::from_secs(final_delay),
        }
    }

    /// Total attempts, never less than one.
    #[must_use]
    pub fn attempts(&self) -> usize {
        (self.base_delays.len() + self.final_retries).max(1)
    }

    /// Every wait between attempts, in order.
    #[must_use]
    pub fn waits(&self) -> Vec<Duration> {
        (1..self.attempts())
            .filter_map(|attempt| self.delay_after(attempt))
            .collect()
    }

    /// Wait before attempt `attempt + 1`, or `None` after the last attempt.
    fn delay_after(&self, attempt: usize) -> Option<Duration> {
        if attempt >= self.attempts() {
            return None;
        }
        Some(
            self.base_delays
                .get(attempt - 1)
                .copied()
                .unwrap_or(self.final_delay),
        )
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_secs(&[1, 2], 1, 4)
    }
}

/// Retry an async operation following `policy`.
///
/// # Returns
/// The first successful result, or the error of the last attempt.
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, policy: &RetryPolicy) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
{
    let total = policy.attempts();
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                let Some(delay) = policy.delay_after(attempt) else {
                    return Err(e);
                };
                warn!(
                    "Request failed (attempt {}/{}): {e}. Retrying after {:?}...",
                    attempt, total, delay
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
