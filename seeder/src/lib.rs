//! Seed a PostgreSQL `users` table once the database accepts connections.
//!
//! The crate follows a ports-and-adapters layout: `domain` holds the retry
//! loop, the pipeline and its ports; `outbound` implements the ports on
//! Diesel; `inbound` renders results for the console; `config` reads the
//! environment.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
