//! Bounded retry loop for Spotify requests.
//!
//! Every retry policy is an explicit attempt counter; nothing here recurses.

use std::future::Future;
use std::time::Duration;

use crate::matching::domain::LookupError;

/// How often and how patiently a request is repeated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub retries: u32,
    /// Delay before the first retry
    pub delay: Duration,
    /// Grow the delay linearly with the attempt number
    pub linear_backoff: bool,
}

impl RetryPolicy {
    /// Token exchange: 3 retries, fixed 5 second delay.
    pub const TOKEN_EXCHANGE: RetryPolicy = RetryPolicy {
        retries: 3,
        delay: Duration::from_secs(5),
        linear_backoff: false,
    };

    /// Search and album lookups: 2 retries, 500ms then 1s.
    pub const API: RetryPolicy = RetryPolicy {
        retries: 2,
        delay: Duration::from_millis(500),
        linear_backoff: true,
    };

    /// No retries at all
    pub const NONE: RetryPolicy = RetryPolicy {
        retries: 0,
        delay: Duration::ZERO,
        linear_backoff: false,
    };

    /// Delay to wait after failed attempt number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if self.linear_backoff {
            self.delay * attempt
        } else {
            self.delay
        }
    }
}

/// Run `op` until it succeeds, fails with an error `should_retry` rejects,
/// or the policy's retries are used up.
///
/// A rate-limit answer carrying `Retry-After` waits that long instead of
/// the policy delay.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    what: &str,
    should_retry: fn(&LookupError) -> bool,
    mut op: F,
) -> Result<T, LookupError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LookupError>>,
{
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(attempt, "{what}: recovered");
                }
                return Ok(value);
            }
            Err(err) if attempt <= policy.retries && should_retry(&err) => {
                let delay = match &err {
                    LookupError::RateLimited {
                        retry_after_secs: Some(secs),
                    } => Duration::from_secs(*secs),
                    _ => policy.delay_for(attempt),
                };
                tracing::warn!(
                    attempt,
                    retries = policy.retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "{what}: failed; retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
