//! Retry logic with exponential backoff.
//!
//! Transient GitLab failures (throttling and 5xx responses) are retried with
//! exponentially growing delays capped at a maximum, plus up to ten percent
//! of random jitter added on top. Every other failure propagates on the
//! first attempt.
//!
//! # Example
//!
//! ```no_run
//! use mr_comments::retry::{RetryPolicy, retry_with_backoff};
//! use mr_comments::gitlab::GitLabError;
//!
//! # async fn example() -> Result<(), GitLabError> {
//! let policy = RetryPolicy::new(3);
//! let value = retry_with_backoff(&policy, "list notes", "corr-1", || async {
//!     Ok::<u32, GitLabError>(42)
//! })
//! .await?;
//! assert_eq!(value, 42);
//! # Ok(())
//! # }
//! ```

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::gitlab::error::GitLabError;

const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10);
const JITTER_DIVISOR: u32 = 10;

/// Errors that can be classified as transient.
pub trait IsRetryable {
    /// Returns true if the operation should be attempted again.
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for GitLabError {
    fn is_retryable(&self) -> bool {
        self.status()
            .is_some_and(|status| status == 429 || status >= 500)
    }
}

/// Attempt budget and delay bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the default 1 s base and 10 s cap.
    ///
    /// `max_attempts` counts the original call; zero is raised to one.
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }

    /// Overrides the delay bounds.
    #[must_use]
    pub const fn with_delays(mut self, base_delay: Duration, max_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self.max_delay = max_delay;
        self
    }

    /// Total attempts including the original call.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the attempt following failed attempt `attempt` (1-based),
    /// without jitter: `min(base * 2^(attempt - 1), max)`.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        2_u32
            .checked_pow(attempt.saturating_sub(1))
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Adds uniform jitter in `[0, delay / 10]` on top of `delay`.
fn add_jitter(delay: Duration) -> Duration {
    let ceiling = delay
        .checked_div(JITTER_DIVISOR)
        .map_or(0, |slice| u64::try_from(slice.as_nanos()).unwrap_or(u64::MAX));
    let jitter = rand::thread_rng().gen_range(0..=ceiling);
    delay.saturating_add(Duration::from_nanos(jitter))
}

/// Runs `operation` until it succeeds, fails permanently, or the attempt
/// budget is spent.
///
/// Each retry logs one warning carrying the attempt number, the budget, the
/// computed delay, the correlation id, and the error text.
///
/// # Errors
///
/// Returns the first non-retryable error, or the last error once
/// `policy.max_attempts()` attempts have failed. Errors are never wrapped.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation_name: &str,
    correlation_id: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: IsRetryable + Display,
{
    let mut attempt = 1_u32;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(
                        operation = operation_name,
                        attempts = attempt,
                        correlation_id,
                        "operation succeeded after retry"
                    );
                }
                return Ok(value);
            }
            Err(error) if error.is_retryable() && attempt < policy.max_attempts() => {
                let delay = add_jitter(policy.backoff_delay(attempt));

                tracing::warn!(
                    operation = operation_name,
                    attempt,
                    max_attempts = policy.max_attempts(),
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    correlation_id,
                    error = %error,
                    "transient failure, retrying"
                );

                tokio::time::sleep(delay).await;
                attempt = attempt.saturating_add(1);
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use rstest::rstest;
    use serde_json::Value;
    use tokio::time::Instant;

    use super::{IsRetryable, RetryPolicy, add_jitter, retry_with_backoff};
    use crate::gitlab::error::GitLabError;

    fn server_error() -> GitLabError {
        GitLabError::Server {
            status: 503,
            message: "unavailable".to_owned(),
        }
    }

    /// In-memory sink for JSON log lines.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .expect("log buffer should not be poisoned")
                .extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn warnings(&self) -> Vec<Value> {
            let buffer = self.0.lock().expect("log buffer should not be poisoned");
            String::from_utf8_lossy(&buffer)
                .lines()
                .map(|line| serde_json::from_str::<Value>(line).expect("log line should be JSON"))
                .filter(|event| event["level"] == "WARN")
                .collect()
        }
    }

    #[rstest]
    #[case::first(1, Duration::from_secs(1))]
    #[case::second(2, Duration::from_secs(2))]
    #[case::third(3, Duration::from_secs(4))]
    #[case::capped(5, Duration::from_secs(10))]
    #[case::overflow(64, Duration::from_secs(10))]
    fn backoff_doubles_until_capped(#[case] attempt: u32, #[case] expected: Duration) {
        assert_eq!(RetryPolicy::new(3).backoff_delay(attempt), expected);
    }

    #[rstest]
    fn zero_attempts_is_clamped_to_one() {
        assert_eq!(RetryPolicy::new(0).max_attempts(), 1);
    }

    #[rstest]
    fn jitter_stays_within_ten_percent() {
        let delay = Duration::from_millis(2_000);
        for _ in 0..200 {
            let jittered = add_jitter(delay);
            assert!(jittered >= delay, "jitter never shortens the delay");
            assert!(jittered <= Duration::from_millis(2_200), "got {jittered:?}");
        }
    }

    #[rstest]
    #[case::rate_limited(GitLabError::RateLimited { rate_limit: None, message: String::new() }, true)]
    #[case::server(server_error(), true)]
    #[case::not_found(GitLabError::NotFound { message: String::new() }, false)]
    #[case::auth(GitLabError::Authentication { status: 401, message: String::new() }, false)]
    #[case::timeout(GitLabError::Timeout { operation: "list notes".to_owned(), timeout_ms: 10 }, false)]
    #[case::network(GitLabError::Network { message: String::new() }, false)]
    fn classifies_retryable_errors(#[case] error: GitLabError, #[case] expected: bool) {
        assert_eq!(error.is_retryable(), expected);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_after_max_attempts_and_returns_last_error() {
        let calls = Cell::new(0_u32);
        let policy = RetryPolicy::new(3);
        let started = Instant::now();

        let result: Result<(), GitLabError> =
            retry_with_backoff(&policy, "list discussions", "corr", || {
                calls.set(calls.get() + 1);
                async { Err(server_error()) }
            })
            .await;

        assert_eq!(result, Err(server_error()));
        assert_eq!(calls.get(), 3, "exactly max_attempts calls");
        let waited = started.elapsed();
        assert!(
            waited >= Duration::from_secs(3) && waited <= Duration::from_millis(3_300),
            "expected 1 s + 2 s of backoff plus jitter, waited {waited:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn logs_one_warning_per_retry() {
        let logs = CapturedLogs::default();
        let sink = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || sink.clone())
            .finish();
        let _default = tracing::subscriber::set_default(subscriber);

        let result: Result<(), GitLabError> =
            retry_with_backoff(&RetryPolicy::new(3), "list discussions", "corr-retry", || async {
                Err(server_error())
            })
            .await;

        assert_eq!(result, Err(server_error()));
        let warnings = logs.warnings();
        assert_eq!(warnings.len(), 2, "one warning per retry, none for the final failure");
        for (index, (warning, base_ms)) in warnings.iter().zip([1_000_u64, 2_000]).enumerate() {
            let fields = &warning["fields"];
            let expected_attempt = u64::try_from(index).expect("index fits") + 1;
            assert_eq!(fields["attempt"], expected_attempt);
            assert_eq!(fields["max_attempts"], 3);
            assert_eq!(fields["correlation_id"], "corr-retry");
            assert_eq!(fields["operation"], "list discussions");
            let delay_ms = fields["delay_ms"].as_u64().expect("delay_ms should be numeric");
            assert!(
                (base_ms..=base_ms + base_ms / 10).contains(&delay_ms),
                "attempt {expected_attempt} delay {delay_ms} ms outside backoff window"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_error_is_attempted_once() {
        let calls = Cell::new(0_u32);

        let result: Result<(), GitLabError> =
            retry_with_backoff(&RetryPolicy::new(5), "list notes", "corr", || {
                calls.set(calls.get() + 1);
                async {
                    Err(GitLabError::NotFound {
                        message: "404 Project Not Found".to_owned(),
                    })
                }
            })
            .await;

        assert!(matches!(result, Err(GitLabError::NotFound { .. })));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_is_not_retried() {
        let calls = Cell::new(0_u32);

        let result: Result<(), GitLabError> =
            retry_with_backoff(&RetryPolicy::new(3), "list notes", "corr", || {
                calls.set(calls.get() + 1);
                async {
                    Err(GitLabError::Timeout {
                        operation: "list notes".to_owned(),
                        timeout_ms: 20_000,
                    })
                }
            })
            .await;

        assert!(matches!(result, Err(GitLabError::Timeout { .. })));
        assert_eq!(calls.get(), 1, "timeouts must not be retried");
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_transient_failure() {
        let calls = Cell::new(0_u32);

        let result = retry_with_backoff(&RetryPolicy::new(3), "list notes", "corr", || {
            calls.set(calls.get() + 1);
            let attempt = calls.get();
            async move {
                if attempt == 1 {
                    Err(server_error())
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(2));
    }
}
