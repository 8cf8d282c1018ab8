//! Retry-with-fixed-delay policy.
//!
//! A fallible operation is attempted up to `max_attempts` times. Between
//! attempts the caller-supplied [`Sleeper`] pauses for the same `delay`; there
//! is no backoff and no sleep after the final failure. The first success stops
//! the loop.

use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;

use tracing::{info, warn};

use super::ports::Sleeper;

/// Default number of connection attempts.
pub const DEFAULT_MAX_ATTEMPTS: NonZeroU32 = match NonZeroU32::new(10) {
    Some(value) => value,
    None => panic!("default attempt count must be non-zero"),
};

/// Default pause between connection attempts.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(3);

/// Bounded attempt count plus constant delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: NonZeroU32,
    delay: Duration,
}

impl RetryPolicy {
    /// Build a policy; at least one attempt is always made.
    ///
    /// # Examples
    /// ```
    /// use std::num::NonZeroU32;
    /// use std::time::Duration;
    /// use seeder::domain::RetryPolicy;
    ///
    /// let attempts = NonZeroU32::new(5).ok_or("zero")?;
    /// let policy = RetryPolicy::new(attempts, Duration::from_millis(250));
    /// assert_eq!(policy.max_attempts().get(), 5);
    /// # Ok::<(), &'static str>(())
    /// ```
    pub const fn new(max_attempts: NonZeroU32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Maximum number of attempts, including the first.
    pub fn max_attempts(&self) -> NonZeroU32 {
        self.max_attempts
    }

    /// Constant pause between attempts.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_DELAY)
    }
}

/// Successful result annotated with the attempt that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempted<T> {
    /// Value returned by the successful attempt.
    pub value: T,
    /// One-based number of the successful attempt.
    pub attempts: u32,
}

/// Every attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("gave up after {attempts} attempt(s): {last_error}")]
pub struct RetryExhausted<E> {
    /// Number of attempts made; always equals the policy maximum.
    pub attempts: u32,
    /// Error returned by the final attempt.
    pub last_error: E,
}

/// Run `operation` under `policy`, pausing with `sleeper` between failures.
///
/// The operation receives the one-based attempt number. Each failure is
/// logged at `warn`; success is logged at `info`.
///
/// # Examples
/// ```
/// use std::cell::Cell;
/// use std::num::NonZeroU32;
/// use std::time::Duration;
/// use seeder::domain::{RetryPolicy, retry_with_fixed_delay};
/// use seeder::domain::ports::Sleeper;
///
/// struct NoSleep;
/// impl Sleeper for NoSleep {
///     fn sleep(&self, _duration: Duration) {}
/// }
///
/// let policy = RetryPolicy::new(NonZeroU32::new(3).ok_or("zero")?, Duration::from_secs(1));
/// let failures_left = Cell::new(2);
/// let outcome = retry_with_fixed_delay(&policy, &NoSleep, |_attempt| {
///     if failures_left.get() > 0 {
///         failures_left.set(failures_left.get() - 1);
///         Err("not yet")
///     } else {
///         Ok("ready")
///     }
/// });
/// assert_eq!(outcome.map(|done| done.attempts), Ok(3));
/// # Ok::<(), &'static str>(())
/// ```
pub fn retry_with_fixed_delay<T, E, F>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    mut operation: F,
) -> Result<Attempted<T>, RetryExhausted<E>>
where
    E: fmt::Display,
    F: FnMut(u32) -> Result<T, E>,
{
    let max_attempts = policy.max_attempts().get();
    let mut attempt = 1;
    loop {
        match operation(attempt) {
            Ok(value) => {
                info!(attempt, max_attempts, "attempt succeeded");
                return Ok(Attempted {
                    value,
                    attempts: attempt,
                });
            }
            Err(error) if attempt < max_attempts => {
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = u64::try_from(policy.delay().as_millis()).unwrap_or(u64::MAX),
                    error = %error,
                    "attempt failed; retrying after delay"
                );
                sleeper.sleep(policy.delay());
                attempt += 1;
            }
            Err(error) => {
                warn!(attempt, max_attempts, error = %error, "final attempt failed");
                return Err(RetryExhausted {
                    attempts: attempt,
                    last_error: error,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Attempt-count and sleep-count coverage for the retry policy.
    use super::*;
    use crate::domain::ports::MockSleeper;
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn policy() -> RetryPolicy {
        RetryPolicy::default()
    }

    fn failing_then_ok(failures: u32) -> impl FnMut(u32) -> Result<&'static str, String> {
        move |attempt| {
            if attempt <= failures {
                Err(format!("refused on attempt {attempt}"))
            } else {
                Ok("connected")
            }
        }
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(5)]
    #[case(9)]
    fn succeeds_after_failures_below_the_limit(policy: RetryPolicy, #[case] failures: u32) {
        let mut sleeper = MockSleeper::new();
        sleeper
            .expect_sleep()
            .with(eq(DEFAULT_DELAY))
            .times(failures as usize)
            .return_const(());

        let outcome = retry_with_fixed_delay(&policy, &sleeper, failing_then_ok(failures))
            .expect("should connect before the limit");

        assert_eq!(outcome.value, "connected");
        assert_eq!(outcome.attempts, failures + 1);
    }

    #[rstest]
    fn exhausts_after_max_attempts(policy: RetryPolicy) {
        let mut sleeper = MockSleeper::new();
        sleeper.expect_sleep().times(9).return_const(());
        let mut calls = 0;

        let error = retry_with_fixed_delay(&policy, &sleeper, |attempt| {
            calls += 1;
            Err::<(), _>(format!("refused on attempt {attempt}"))
        })
        .expect_err("all attempts fail");

        assert_eq!(calls, 10);
        assert_eq!(error.attempts, 10);
        assert_eq!(error.last_error, "refused on attempt 10");
    }

    #[rstest]
    fn stops_calling_once_an_attempt_succeeds(policy: RetryPolicy) {
        let mut sleeper = MockSleeper::new();
        sleeper.expect_sleep().times(2).return_const(());
        let mut calls = Vec::new();

        let _ = retry_with_fixed_delay(&policy, &sleeper, |attempt| {
            calls.push(attempt);
            if attempt < 3 { Err("down") } else { Ok(()) }
        });

        assert_eq!(calls, vec![1, 2, 3]);
    }

    #[rstest]
    fn single_attempt_policy_never_sleeps() {
        let policy = RetryPolicy::new(NonZeroU32::MIN, Duration::from_secs(3));
        let mut sleeper = MockSleeper::new();
        sleeper.expect_sleep().never();

        let error = retry_with_fixed_delay(&policy, &sleeper, |_| Err::<(), _>("down"))
            .expect_err("single attempt fails");

        assert_eq!(error.attempts, 1);
    }

    #[rstest]
    fn exhaustion_message_names_attempts_and_cause() {
        let error = RetryExhausted {
            attempts: 10,
            last_error: "connection refused",
        };
        assert_eq!(
            error.to_string(),
            "gave up after 10 attempt(s): connection refused"
        );
    }
}
