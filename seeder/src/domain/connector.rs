//! Dependency-ready connector.
//!
//! Wraps a [`DatabaseConnector`] in a [`RetryPolicy`] so callers receive an
//! open session or a single fatal [`Error::DependencyUnavailable`]. Time spent
//! waiting is measured with the injected clock so tests can drive it.

use std::sync::Arc;
use std::time::Duration;

use mockable::{Clock, DefaultClock};
use tracing::info;

use super::error::Error;
use super::ports::{DatabaseConnector, Sleeper, ThreadSleeper};
use super::retry::{RetryPolicy, retry_with_fixed_delay};

/// Open session plus how long it took to obtain.
#[derive(Debug)]
pub struct ReadyConnection<S> {
    /// Session returned by the successful attempt.
    pub session: S,
    /// Number of attempts made, including the successful one.
    pub attempts: u32,
    /// Wall-clock time between the first attempt and success.
    pub waited: Duration,
}

/// Retrying front for a [`DatabaseConnector`].
pub struct DependencyReadyConnector<C> {
    connector: C,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    clock: Arc<dyn Clock>,
}

impl<C: DatabaseConnector> DependencyReadyConnector<C> {
    /// Build a connector that sleeps on the current thread and reads the
    /// system clock.
    pub fn new(connector: C, policy: RetryPolicy) -> Self {
        Self::with_runtime(
            connector,
            policy,
            Arc::new(ThreadSleeper),
            Arc::new(DefaultClock),
        )
    }

    /// Build a connector with injected sleep and clock implementations.
    pub fn with_runtime(
        connector: C,
        policy: RetryPolicy,
        sleeper: Arc<dyn Sleeper>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            connector,
            policy,
            sleeper,
            clock,
        }
    }

    /// Attempt to connect until success or exhaustion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DependencyUnavailable`] once every attempt allowed by
    /// the policy has failed. No attempt is made after the first success.
    pub fn connect(&self) -> Result<ReadyConnection<C::Session>, Error> {
        let target = self.connector.target();
        let started = self.clock.utc();
        info!(
            database = %target,
            max_attempts = self.policy.max_attempts().get(),
            delay_ms = u64::try_from(self.policy.delay().as_millis()).unwrap_or(u64::MAX),
            "waiting for database"
        );

        let outcome = retry_with_fixed_delay(&self.policy, self.sleeper.as_ref(), |_attempt| {
            self.connector.connect()
        });
        let waited = (self.clock.utc() - started).to_std().unwrap_or_default();

        match outcome {
            Ok(done) => {
                info!(
                    database = %target,
                    attempts = done.attempts,
                    waited_ms = u64::try_from(waited.as_millis()).unwrap_or(u64::MAX),
                    "connected to database"
                );
                Ok(ReadyConnection {
                    session: done.value,
                    attempts: done.attempts,
                    waited,
                })
            }
            Err(exhausted) => Err(Error::dependency_unavailable(
                target,
                exhausted.attempts,
                waited,
                exhausted.last_error,
            )),
        }
    }
}
