use super::config::RetryConfig;
use super::error::{FetchError, RemoteError};
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Blocks the current thread for the given duration.
pub type Sleeper = Arc<dyn Fn(Duration) + Send + Sync>;

/// The retry-with-backoff policy wrapped around every remote collaborator call.
///
/// Each call is preceded by the configured request delay. A [`FetchError::Transient`]
/// failure is retried up to `max_retries` times, waiting `base_delay * 2^(k-1)` before
/// the k-th retry. A [`FetchError::Permanent`] failure is returned immediately.
#[derive(Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    request_delay: Duration,
    sleeper: Sleeper,
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("request_delay", &self.request_delay)
            .finish_non_exhaustive()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: config.base_delay,
            request_delay: config.request_delay,
            sleeper: Arc::new(thread::sleep),
        }
    }

    /// Replaces the function used to wait between calls.
    pub fn with_sleeper(mut self, sleeper: Sleeper) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before retry number `retry` (1-based).
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let factor = 1u32
            .checked_shl(retry.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            (self.sleeper)(delay);
        }
    }

    /// Runs `operation` under the policy.
    ///
    /// # Arguments
    ///
    /// * `label` - Identifies the call in log output.
    /// * `operation` - The remote call; invoked once per attempt.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Permanent`] on the first permanent failure, or
    /// [`RemoteError::Transient`] once every retry has failed transiently.
    pub fn fetch<T, F>(&self, label: &str, mut operation: F) -> Result<T, RemoteError>
    where
        F: FnMut() -> Result<T, FetchError>,
    {
        self.pause(self.request_delay);

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match operation() {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(label, attempt, "Remote call succeeded after retry.");
                    }
                    return Ok(value);
                }
                Err(FetchError::Permanent(message)) => {
                    warn!(label, %message, "Remote call failed permanently; not retrying.");
                    return Err(RemoteError::Permanent { message });
                }
                Err(FetchError::Transient(message)) => {
                    if attempt > self.max_retries {
                        warn!(label, attempts = attempt, %message, "Remote call failed; retries exhausted.");
                        return Err(RemoteError::Transient {
                            attempts: attempt,
                            message,
                        });
                    }
                    let delay = self.backoff_delay(attempt);
                    warn!(
                        label,
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        %message,
                        "Transient failure; retrying."
                    );
                    self.pause(delay);
                }
            }
        }
    }
}
