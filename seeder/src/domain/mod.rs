//! Domain primitives, ports, and the seeding workflow.
//!
//! Public surface:
//! - `User`, `NewUser`, `UserId`, `UserName`, `UserEmail`: the single entity.
//! - `RetryPolicy` and `retry_with_fixed_delay`: reusable wait-for-dependency
//!   policy.
//! - `DependencyReadyConnector`: retrying front for a `DatabaseConnector`.
//! - `seed_users` / `run_seed`: the ordered seed pipeline.
//! - `Error`: the two fatal outcomes of a run.

pub mod connector;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod retry;
pub mod user;

pub use self::connector::{DependencyReadyConnector, ReadyConnection};
pub use self::error::{Error, PipelineStep};
pub use self::pipeline::{SeedReport, SeedSummary, run_seed, seed_users};
pub use self::retry::{
    Attempted, DEFAULT_DELAY, DEFAULT_MAX_ATTEMPTS, RetryExhausted, RetryPolicy,
    retry_with_fixed_delay,
};
pub use self::user::{
    InsertOutcome, NewUser, USER_FIELD_MAX, User, UserEmail, UserId, UserName,
    UserValidationError,
};
