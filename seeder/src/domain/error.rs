//! Domain-level error types.
//!
//! Both variants are fatal to the seeding run. Adapters and the binary decide
//! how to present them; the domain only classifies them.

use std::fmt;
use std::time::Duration;

use super::ports::{ConnectError, UserStoreError};

/// Ordered steps of the seed pipeline that run on an open connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStep {
    /// Create the `users` table if absent.
    EnsureSchema,
    /// Insert the candidate user unless it already exists.
    InsertCandidate,
    /// Read back every stored user.
    ListUsers,
    /// Release the connection.
    Close,
}

impl PipelineStep {
    /// Stable snake-case label used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnsureSchema => "ensure_schema",
            Self::InsertCandidate => "insert_candidate",
            Self::ListUsers => "list_users",
            Self::Close => "close",
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal outcomes of a seeding run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The database never accepted a connection within the retry budget.
    #[error(
        "database at {target} unavailable after {attempts} attempt(s) over {waited:?}: {last_error}"
    )]
    DependencyUnavailable {
        /// Credential-free description of the target.
        target: String,
        /// Attempts made before giving up.
        attempts: u32,
        /// Total time spent waiting.
        waited: Duration,
        /// Failure reported by the final attempt.
        #[source]
        last_error: ConnectError,
    },
    /// A pipeline step failed after the connection was established.
    #[error("{step} failed: {source}")]
    QueryFailure {
        /// Step that failed; later steps did not run.
        step: PipelineStep,
        /// Underlying store failure.
        #[source]
        source: UserStoreError,
    },
}

impl Error {
    /// Build a [`Error::DependencyUnavailable`].
    pub fn dependency_unavailable(
        target: impl Into<String>,
        attempts: u32,
        waited: Duration,
        last_error: ConnectError,
    ) -> Self {
        Self::DependencyUnavailable {
            target: target.into(),
            attempts,
            waited,
            last_error,
        }
    }

    /// Build a [`Error::QueryFailure`] for `step`.
    pub fn query_failure(step: PipelineStep, source: UserStoreError) -> Self {
        Self::QueryFailure { step, source }
    }

    /// Failed pipeline step, if this is a query failure.
    pub fn step(&self) -> Option<PipelineStep> {
        match self {
            Self::QueryFailure { step, .. } => Some(*step),
            Self::DependencyUnavailable { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Message and classification coverage for domain errors.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn dependency_unavailable_message_includes_cause() {
        let error = Error::dependency_unavailable(
            "localhost:5432/app",
            10,
            Duration::from_secs(27),
            ConnectError::unreachable("connection refused"),
        );

        let message = error.to_string();
        assert!(message.contains("localhost:5432/app"));
        assert!(message.contains("10 attempt(s)"));
        assert!(message.contains("connection refused"));
        assert_eq!(error.step(), None);
    }

    #[rstest]
    #[case(PipelineStep::EnsureSchema, "ensure_schema failed")]
    #[case(PipelineStep::ListUsers, "list_users failed")]
    fn query_failure_names_the_step(#[case] step: PipelineStep, #[case] prefix: &str) {
        let error = Error::query_failure(step, UserStoreError::query("syntax error"));

        assert!(error.to_string().starts_with(prefix));
        assert_eq!(error.step(), Some(step));
    }
}
