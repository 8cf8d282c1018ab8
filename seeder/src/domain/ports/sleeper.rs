//! Blocking sleep abstraction used between retry attempts.

use std::time::Duration;

/// Suspends the current thread between attempts.
#[cfg_attr(test, mockall::automock)]
pub trait Sleeper {
    /// Block for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
