//! # Retry-With-Timeout
//!
//! Bounded retries with deterministic exponential backoff and a per-attempt
//! deadline, used for the landing page's listing fetches.
//!
//! The control flow is an explicit state machine:
//!
//! ```text
//!            success
//! Attempting ───────────────► Succeeded
//!     │  ▲
//!     │  │ backoff elapsed
//!     │  │
//!     ▼  │
//!   Backoff        failure on last attempt
//! Attempting ───────────────► Exhausted
//! ```
//!
//! [`transition`] is pure; [`retry_with_timeout`] drives it, performing the
//! request and sleeps each state calls for. A timed-out attempt is cancelled
//! (its future is dropped) and counts as a failure just like a network error.
//! The delay after zero-based attempt `i` is `base_delay * 2^i`, with no
//! jitter.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::core::error::{AppError, Result};

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(30_000);
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1_000);

/// Retry parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts (values below 1 behave as 1)
    pub max_retries: u32,
    /// Deadline of each individual attempt
    pub timeout: Duration,
    /// Delay after the first failed attempt
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: DEFAULT_ATTEMPT_TIMEOUT,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, timeout: Duration) -> Self {
        Self {
            max_retries,
            timeout,
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Delay after zero-based attempt `attempt_index` fails.
    pub fn backoff_delay(&self, attempt_index: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt_index).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Sum of all backoff delays when every attempt fails.
    pub fn total_backoff(&self) -> Duration {
        (0..self.attempts().saturating_sub(1))
            .map(|i| self.backoff_delay(i))
            .fold(Duration::ZERO, |acc, d| acc.saturating_add(d))
    }
}

/// Ephemeral description of one attempt, handed to the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchAttempt {
    pub url: String,
    /// Attempts left after this one
    pub retries_remaining: u32,
    pub timeout: Duration,
    /// One-based
    pub attempt_number: u32,
}

/// Retry state; `attempt` indexes are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Attempting { attempt: u32 },
    Backoff { attempt: u32, delay: Duration },
    Exhausted { attempts: u32 },
    Succeeded { attempt: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryEvent {
    AttemptSucceeded,
    AttemptFailed,
    BackoffElapsed,
}

impl RetryState {
    pub fn initial() -> Self {
        RetryState::Attempting { attempt: 0 }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RetryState::Exhausted { .. } | RetryState::Succeeded { .. })
    }
}

/// Pure transition function. Events that do not apply to a state leave it unchanged.
pub fn transition(state: RetryState, event: RetryEvent, policy: &RetryPolicy) -> RetryState {
    match (state, event) {
        (RetryState::Attempting { attempt }, RetryEvent::AttemptSucceeded) => {
            RetryState::Succeeded { attempt }
        }
        (RetryState::Attempting { attempt }, RetryEvent::AttemptFailed) => {
            if attempt + 1 >= policy.attempts() {
                RetryState::Exhausted {
                    attempts: attempt + 1,
                }
            } else {
                RetryState::Backoff {
                    attempt,
                    delay: policy.backoff_delay(attempt),
                }
            }
        }
        (RetryState::Backoff { attempt, .. }, RetryEvent::BackoffElapsed) => {
            RetryState::Attempting {
                attempt: attempt + 1,
            }
        }
        (state, _) => state,
    }
}

/// Run `op` under `policy`, returning the first success or the last error.
///
/// `label` identifies the resource in logs and in [`FetchAttempt::url`].
pub async fn retry_with_timeout<T, F, Fut>(label: &str, policy: &RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut(FetchAttempt) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.attempts();
    let mut state = RetryState::initial();
    let mut last_error: Option<AppError> = None;

    loop {
        state = match state {
            RetryState::Attempting { attempt } => {
                let fetch = FetchAttempt {
                    url: label.to_string(),
                    retries_remaining: attempts - attempt - 1,
                    timeout: policy.timeout,
                    attempt_number: attempt + 1,
                };

                match tokio::time::timeout(policy.timeout, op(fetch)).await {
                    Ok(Ok(value)) => {
                        let next = transition(state, RetryEvent::AttemptSucceeded, policy);
                        debug!(url = %label, state = ?next, "Fetch succeeded");
                        return Ok(value);
                    }
                    Ok(Err(e)) => {
                        error!(
                            url = %label,
                            attempt = attempt + 1,
                            attempts,
                            error = %e,
                            "Fetch error"
                        );
                        last_error = Some(e);
                    }
                    Err(_) => {
                        warn!(
                            url = %label,
                            attempt = attempt + 1,
                            attempts,
                            timeout_ms = policy.timeout.as_millis() as u64,
                            "Fetch aborted after timeout"
                        );
                        last_error = Some(AppError::Timeout {
                            after_ms: policy.timeout.as_millis() as u64,
                        });
                    }
                }
                transition(state, RetryEvent::AttemptFailed, policy)
            }
            RetryState::Backoff { delay, .. } => {
                debug!(url = %label, delay_ms = delay.as_millis() as u64, "Backing off");
                tokio::time::sleep(delay).await;
                transition(state, RetryEvent::BackoffElapsed, policy)
            }
            RetryState::Exhausted { attempts } => {
                warn!(url = %label, attempts, "Retries exhausted");
                return Err(last_error.unwrap_or_else(|| {
                    AppError::Network(format!("{} failed without an attempt", label))
                }));
            }
            RetryState::Succeeded { .. } => {
                // Success returns from the Attempting arm with its value
                return Err(AppError::Network(format!("{} finished without a value", label)));
            }
        };
    }
}
