//! Port abstraction for opening a single connection to the data store.

use super::{UserStore, define_port_error};

define_port_error! {
    /// Failure of a single connection attempt.
    pub enum ConnectError {
        /// The server could not be reached or refused the session.
        Unreachable { message: String } => "database unreachable: {message}",
        /// The connection parameters were rejected before a session opened.
        InvalidParameters { message: String } => "invalid connection parameters: {message}",
    }
}

/// Opens one connection per call. Retrying is the caller's concern.
pub trait DatabaseConnector {
    /// Session type yielded by a successful attempt.
    type Session: UserStore;

    /// Human-readable description of the target, free of credentials.
    fn target(&self) -> String;

    /// Make one connection attempt.
    fn connect(&self) -> Result<Self::Session, ConnectError>;
}
