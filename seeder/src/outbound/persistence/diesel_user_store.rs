//! PostgreSQL-backed user store.
//!
//! Implements the `UserStore` port on one Diesel [`PgConnection`]. Statements
//! run in autocommit mode: the DDL and the insert are each durable as soon as
//! they return.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::domain::ports::{UserStore, UserStoreError};
use crate::domain::{InsertOutcome, NewUser, User, UserId};

use super::models::{NewUserRow, UserRow};
use super::schema::users;

/// Idempotent DDL for the `users` table.
pub const CREATE_USERS_TABLE: &str = concat!(
    "CREATE TABLE IF NOT EXISTS users (",
    "id SERIAL PRIMARY KEY, ",
    "name VARCHAR(50), ",
    "email VARCHAR(50), ",
    "UNIQUE (name, email)",
    ")"
);

/// Diesel-backed implementation of the user store port.
pub struct DieselUserStore {
    connection: PgConnection,
}

impl DieselUserStore {
    /// Wrap an established connection.
    pub fn new(connection: PgConnection) -> Self {
        Self { connection }
    }
}

/// Map Diesel errors to domain persistence errors.
fn map_diesel_error(error: diesel::result::Error) -> UserStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    let error_message = error.to_string();
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                error = %error_message,
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            error = %error_message,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => UserStoreError::query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            UserStoreError::connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => UserStoreError::query(info.message().to_owned()),
        _ => UserStoreError::query(error_message),
    }
}

fn map_row(row: UserRow) -> User {
    User::new(UserId::new(row.id), row.name, row.email)
}

impl UserStore for DieselUserStore {
    fn ensure_schema(&mut self) -> Result<(), UserStoreError> {
        diesel::sql_query(CREATE_USERS_TABLE)
            .execute(&mut self.connection)
            .map_err(map_diesel_error)?;
        Ok(())
    }

    fn insert_if_absent(&mut self, user: &NewUser) -> Result<InsertOutcome, UserStoreError> {
        let row = NewUserRow {
            name: user.name().as_ref(),
            email: user.email().as_ref(),
        };

        let inserted = diesel::insert_into(users::table)
            .values(&row)
            .on_conflict((users::name, users::email))
            .do_nothing()
            .returning(users::id)
            .get_result::<i32>(&mut self.connection)
            .optional()
            .map_err(map_diesel_error)?;

        Ok(inserted.map_or(InsertOutcome::AlreadyExists, |id| {
            InsertOutcome::Inserted(UserId::new(id))
        }))
    }

    fn list_users(&mut self) -> Result<Vec<User>, UserStoreError> {
        let rows = users::table
            .select(UserRow::as_select())
            .order(users::id.asc())
            .load::<UserRow>(&mut self.connection)
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(map_row).collect())
    }

    fn close(self) -> Result<(), UserStoreError> {
        // libpq sends Terminate when the connection is dropped.
        drop(self.connection);
        debug!("postgres connection closed");
        Ok(())
    }
}
