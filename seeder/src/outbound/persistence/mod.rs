//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! - **Thin adapters**: `DieselUserStore` only translates between Diesel rows
//!   and domain types; the seed pipeline owns the ordering of operations.
//! - **Internal models**: row structs (`models.rs`) and the table definition
//!   (`schema.rs`) never leave this module.
//! - **One connection**: `PgConnector` makes a single blocking attempt per call
//!   and leaves retrying to the domain connector.
//!
//! # Example
//!
//! ```rust,no_run
//! use seeder::domain::{DependencyReadyConnector, NewUser, RetryPolicy, run_seed};
//! use seeder::outbound::persistence::{ConnectionParams, PgConnector};
//!
//! # fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let params = ConnectionParams::new("localhost", 5432, "app", "app", "secret");
//! let connector = DependencyReadyConnector::new(PgConnector::new(&params)?, RetryPolicy::default());
//! let candidate = NewUser::try_from_strings("Alice", "alice@example.com")?;
//! let summary = run_seed(&connector, &candidate)?;
//! # let _ = summary;
//! # Ok(())
//! # }
//! ```

mod connection;
mod diesel_user_store;
mod models;
mod schema;

pub use connection::{ConnectionParams, ConnectionParamsError, PgConnector};
pub use diesel_user_store::{CREATE_USERS_TABLE, DieselUserStore};
