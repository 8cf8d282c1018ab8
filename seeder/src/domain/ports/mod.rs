//! Domain ports: the seams between seeding logic and its adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod database_connector;
mod sleeper;
mod user_store;

pub use database_connector::{ConnectError, DatabaseConnector};
#[cfg(test)]
pub use sleeper::MockSleeper;
pub use sleeper::{Sleeper, ThreadSleeper};
pub use user_store::{UserStore, UserStoreError};
