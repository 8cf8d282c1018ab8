//! Test utilities for the seeder crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`). Only
//! compiled for tests or with the `test-support` feature.

mod clock;
mod store;

pub use clock::{AdvancingSleeper, MutableClock};
pub use store::{InMemoryUserStore, ScriptedConnector, StoreFault};
