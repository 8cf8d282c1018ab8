//! Seed pipeline: connect, ensure schema, insert-or-skip, list, close.
//!
//! Each step is fallible and runs in the order [`PipelineStep`] lists. The first
//! failure stops the pipeline and is reported as [`Error::QueryFailure`]
//! naming the step; the session is dropped (and so closed) on that path.

use std::time::Duration;

use tracing::{debug, info};

use super::connector::DependencyReadyConnector;
use super::error::{Error, PipelineStep};
use super::ports::{DatabaseConnector, UserStore, UserStoreError};
use super::user::{InsertOutcome, NewUser, User};

/// Result of running the pipeline on an open session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    /// Whether the candidate was inserted or already present.
    pub outcome: InsertOutcome,
    /// Every stored user, ascending by id.
    pub users: Vec<User>,
}

/// Full run summary including connection statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    /// Connection attempts used.
    pub attempts: u32,
    /// Time spent waiting for the database.
    pub waited: Duration,
    /// Pipeline result.
    pub report: SeedReport,
}

fn run_step<T>(
    step: PipelineStep,
    operation: impl FnOnce() -> Result<T, UserStoreError>,
) -> Result<T, Error> {
    debug!(step = %step, "running pipeline step");
    operation().map_err(|source| Error::query_failure(step, source))
}

/// Run the post-connection steps against `store`, consuming it.
///
/// # Errors
///
/// Returns [`Error::QueryFailure`] for the first step that fails.
pub fn seed_users<S: UserStore>(mut store: S, candidate: &NewUser) -> Result<SeedReport, Error> {
    run_step(PipelineStep::EnsureSchema, || store.ensure_schema())?;

    let outcome = run_step(PipelineStep::InsertCandidate, || {
        store.insert_if_absent(candidate)
    })?;
    match outcome {
        InsertOutcome::Inserted(id) => {
            info!(user_id = id.get(), name = %candidate.name(), "inserted new user");
        }
        InsertOutcome::AlreadyExists => {
            info!(name = %candidate.name(), "user already exists; skipping insert");
        }
    }

    let users = run_step(PipelineStep::ListUsers, || store.list_users())?;
    run_step(PipelineStep::Close, || store.close())?;

    Ok(SeedReport { outcome, users })
}

/// Wait for the database, then run [`seed_users`] on the new session.
///
/// # Errors
///
/// Returns [`Error::DependencyUnavailable`] when the connector gives up, or
/// [`Error::QueryFailure`] when a pipeline step fails.
pub fn run_seed<C: DatabaseConnector>(
    connector: &DependencyReadyConnector<C>,
    candidate: &NewUser,
) -> Result<SeedSummary, Error> {
    let ready = connector.connect()?;
    let report = seed_users(ready.session, candidate)?;
    Ok(SeedSummary {
        attempts: ready.attempts,
        waited: ready.waited,
        report,
    })
}
