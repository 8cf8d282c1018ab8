//! Controllable time for retry tests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::Sleeper;

/// Clock whose current instant only moves when told to.
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => {
                panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}")
            }
        };
        *self.lock_clock() += delta;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Sleeper that returns immediately, advancing a [`MutableClock`] instead.
#[derive(Debug)]
pub struct AdvancingSleeper {
    clock: Arc<MutableClock>,
    recorded: Mutex<Vec<Duration>>,
}

impl AdvancingSleeper {
    /// Advance `clock` on every sleep.
    pub fn new(clock: Arc<MutableClock>) -> Self {
        Self {
            clock,
            recorded: Mutex::new(Vec::new()),
        }
    }

    /// Durations requested so far, in call order.
    pub fn recorded(&self) -> Vec<Duration> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Sleeper for AdvancingSleeper {
    fn sleep(&self, duration: Duration) {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
        self.clock.advance(duration);
    }
}
