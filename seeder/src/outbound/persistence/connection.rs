//! Single-connection PostgreSQL connector.
//!
//! One call to [`PgConnector::connect`] makes one blocking libpq connection
//! attempt. There is no pool: the seed run needs exactly one session, held for
//! the lifetime of the pipeline.

use std::fmt;

use diesel::ConnectionError as DieselConnectionError;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{ConnectError, DatabaseConnector};

use super::diesel_user_store::DieselUserStore;

/// Errors raised while assembling a connection string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionParamsError {
    /// libpq cannot carry NUL bytes in a parameter value.
    #[error("connection parameter '{keyword}' contains a NUL byte")]
    NulByte {
        /// libpq keyword whose value was rejected.
        keyword: &'static str,
    },
}

/// Quote `value` for a libpq keyword/value connection string.
fn push_param(
    conninfo: &mut String,
    keyword: &'static str,
    value: &str,
) -> Result<(), ConnectionParamsError> {
    if value.contains('\0') {
        return Err(ConnectionParamsError::NulByte { keyword });
    }
    if !conninfo.is_empty() {
        conninfo.push(' ');
    }
    conninfo.push_str(keyword);
    conninfo.push_str("='");
    for ch in value.chars() {
        if matches!(ch, '\'' | '\\') {
            conninfo.push('\\');
        }
        conninfo.push(ch);
    }
    conninfo.push('\'');
    Ok(())
}

/// Host, port, database, and credentials for one PostgreSQL server.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    host: String,
    port: u16,
    database: String,
    user: String,
    password: Zeroizing<String>,
}

impl ConnectionParams {
    /// Collect connection parameters.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            database: database.into(),
            user: user.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Server host name or address.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Server port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Database name.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Login role.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// `host:port/database`, safe to log.
    pub fn target(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.database)
    }

    /// Render a libpq keyword/value connection string.
    ///
    /// Every value is quoted, so hostnames, IPv6 literals and Unix socket
    /// directories all pass through to libpq unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionParamsError::NulByte`] when a value contains a NUL
    /// byte.
    ///
    /// # Examples
    /// ```
    /// use seeder::outbound::persistence::ConnectionParams;
    ///
    /// let params = ConnectionParams::new("db", 5432, "app", "seed", "it's");
    /// let conninfo = params.conninfo()?;
    /// assert_eq!(
    ///     conninfo.as_str(),
    ///     r"host='db' port='5432' dbname='app' user='seed' password='it\'s'"
    /// );
    /// # Ok::<(), seeder::outbound::persistence::ConnectionParamsError>(())
    /// ```
    pub fn conninfo(&self) -> Result<Zeroizing<String>, ConnectionParamsError> {
        let mut conninfo = Zeroizing::new(String::new());
        push_param(&mut conninfo, "host", &self.host)?;
        push_param(&mut conninfo, "port", &self.port.to_string())?;
        push_param(&mut conninfo, "dbname", &self.database)?;
        push_param(&mut conninfo, "user", &self.user)?;
        push_param(&mut conninfo, "password", &self.password)?;
        Ok(conninfo)
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opens Diesel [`PgConnection`]s and wraps them as [`DieselUserStore`]s.
pub struct PgConnector {
    conninfo: Zeroizing<String>,
    target: String,
}

impl PgConnector {
    /// Build a connector from validated parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionParamsError`] when the connection string cannot be
    /// assembled.
    pub fn new(params: &ConnectionParams) -> Result<Self, ConnectionParamsError> {
        Ok(Self {
            conninfo: params.conninfo()?,
            target: params.target(),
        })
    }

    /// Build a connector from a ready-made connection URL or conninfo string.
    pub fn from_url(database_url: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            conninfo: Zeroizing::new(database_url.into()),
            target: target.into(),
        }
    }
}

impl fmt::Debug for PgConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgConnector")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Map Diesel connection errors to the connector port error.
pub(super) fn map_connection_error(error: DieselConnectionError) -> ConnectError {
    debug!(error = %error, "postgres connection attempt failed");
    match &error {
        DieselConnectionError::InvalidCString(_) | DieselConnectionError::InvalidConnectionUrl(_) => {
            ConnectError::invalid_parameters(error.to_string())
        }
        _ => ConnectError::unreachable(error.to_string()),
    }
}

impl DatabaseConnector for PgConnector {
    type Session = DieselUserStore;

    fn target(&self) -> String {
        self.target.clone()
    }

    fn connect(&self) -> Result<Self::Session, ConnectError> {
        let connection =
            PgConnection::establish(self.conninfo.as_str()).map_err(map_connection_error)?;
        Ok(DieselUserStore::new(connection))
    }
}
