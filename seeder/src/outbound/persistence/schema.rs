//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match [`super::diesel_user_store::CREATE_USERS_TABLE`]
//! exactly. The DDL declares `name` and `email` without `NOT NULL`, so both are
//! nullable here.

diesel::table! {
    /// Seeded users.
    ///
    /// `id` is a `SERIAL` surrogate key; `(name, email)` carries a unique
    /// constraint.
    users (id) {
        /// Primary key assigned by the `users_id_seq` sequence.
        id -> Int4,
        /// User name (max 50 characters).
        name -> Nullable<Varchar>,
        /// Email address (max 50 characters).
        email -> Nullable<Varchar>,
    }
}
