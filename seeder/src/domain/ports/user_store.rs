//! Port abstraction for the user table on an established connection.
//!
//! A store is the session handed back by a [`super::DatabaseConnector`]. Each
//! operation runs immediately against the connection; there is no retry at
//! this layer.

use crate::domain::{InsertOutcome, NewUser, User};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user store adapters.
    pub enum UserStoreError {
        /// The connection dropped while an operation was in flight.
        Connection { message: String } => "user store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user store query failed: {message}",
    }
}

/// Operations the seed pipeline performs on an open connection.
pub trait UserStore {
    /// Create the `users` table when it does not exist yet.
    fn ensure_schema(&mut self) -> Result<(), UserStoreError>;

    /// Insert `user` unless a row with the same `(name, email)` pair exists.
    fn insert_if_absent(&mut self, user: &NewUser) -> Result<InsertOutcome, UserStoreError>;

    /// Read every stored user in ascending id order.
    fn list_users(&mut self) -> Result<Vec<User>, UserStoreError>;

    /// Release the underlying connection.
    fn close(self) -> Result<(), UserStoreError>
    where
        Self: Sized;
}
