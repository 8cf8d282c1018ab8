//! User data model.
//!
//! A user is identified by a database-generated surrogate key and carries a
//! name and an email address. The `(name, email)` pair is unique across all
//! stored users; inserting an existing pair is a no-op.

use std::fmt;

/// Maximum length, in characters, of a user name or email address.
///
/// Mirrors the `VARCHAR(50)` columns of the `users` table.
pub const USER_FIELD_MAX: usize = 50;

/// Validation errors returned by [`UserName::new`] and [`UserEmail::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The name was empty or only whitespace.
    EmptyName,
    /// The name exceeded [`USER_FIELD_MAX`] characters.
    NameTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// The email was empty or only whitespace.
    EmptyEmail,
    /// The email exceeded [`USER_FIELD_MAX`] characters.
    EmailTooLong {
        /// Maximum permitted length.
        max: usize,
    },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "user name must not be empty"),
            Self::NameTooLong { max } => write!(f, "user name must be at most {max} characters"),
            Self::EmptyEmail => write!(f, "user email must not be empty"),
            Self::EmailTooLong { max } => {
                write!(f, "user email must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Surrogate key assigned by the database on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a raw identifier read back from storage.
    pub fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Access the raw integer value.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn check_field(
    value: &str,
    empty: UserValidationError,
    too_long: UserValidationError,
) -> Result<(), UserValidationError> {
    if value.trim().is_empty() {
        return Err(empty);
    }
    if value.chars().count() > USER_FIELD_MAX {
        return Err(too_long);
    }
    Ok(())
}

/// Bounded-length user name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`].
    ///
    /// # Examples
    /// ```
    /// use seeder::domain::UserName;
    ///
    /// assert!(UserName::new("Alice").is_ok());
    /// assert!(UserName::new("   ").is_err());
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        check_field(
            &name,
            UserValidationError::EmptyName,
            UserValidationError::NameTooLong {
                max: USER_FIELD_MAX,
            },
        )?;
        Ok(Self(name))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bounded-length email address.
///
/// Only emptiness and length are checked; the address format is not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserEmail(String);

impl UserEmail {
    /// Validate and construct a [`UserEmail`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        check_field(
            &email,
            UserValidationError::EmptyEmail,
            UserValidationError::EmailTooLong {
                max: USER_FIELD_MAX,
            },
        )?;
        Ok(Self(email))
    }
}

impl AsRef<str> for UserEmail {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Candidate record for an insert-or-skip operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NewUser {
    name: UserName,
    email: UserEmail,
}

impl NewUser {
    /// Pair a validated name and email.
    pub fn new(name: UserName, email: UserEmail) -> Self {
        Self { name, email }
    }

    /// Validate raw strings into a candidate.
    ///
    /// # Examples
    /// ```
    /// use seeder::domain::NewUser;
    ///
    /// let candidate = NewUser::try_from_strings("Alice", "alice@example.com")?;
    /// assert_eq!(candidate.name().as_ref(), "Alice");
    /// # Ok::<(), seeder::domain::UserValidationError>(())
    /// ```
    pub fn try_from_strings(
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self::new(UserName::new(name)?, UserEmail::new(email)?))
    }

    /// Name half of the uniqueness key.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Email half of the uniqueness key.
    pub fn email(&self) -> &UserEmail {
        &self.email
    }
}

/// Stored user record.
///
/// Columns are read back as stored: the table allows NULLs and other clients
/// may write values the seeder would never insert, so only the insert
/// candidate is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: Option<String>,
    email: Option<String>,
}

impl User {
    /// Assemble a stored user from raw column values.
    pub fn new(id: UserId, name: Option<String>, email: Option<String>) -> Self {
        Self { id, name, email }
    }

    /// Record created by inserting `candidate` under `id`.
    pub fn from_candidate(id: UserId, candidate: &NewUser) -> Self {
        Self::new(
            id,
            Some(candidate.name().as_ref().to_owned()),
            Some(candidate.email().as_ref().to_owned()),
        )
    }

    /// Database-assigned identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Stored name, `None` for SQL NULL.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Stored email address, `None` for SQL NULL.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Whether this record holds the same `(name, email)` pair as `candidate`.
    ///
    /// A NULL column never matches, as with the table's unique constraint.
    pub fn matches(&self, candidate: &NewUser) -> bool {
        self.name() == Some(candidate.name().as_ref())
            && self.email() == Some(candidate.email().as_ref())
    }
}

/// Result of an insert-or-skip operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was created with the given identifier.
    Inserted(UserId),
    /// A row with the same `(name, email)` pair already existed.
    AlreadyExists,
}

impl InsertOutcome {
    /// Identifier of the newly created row, if one was created.
    pub fn inserted_id(self) -> Option<UserId> {
        match self {
            Self::Inserted(id) => Some(id),
            Self::AlreadyExists => None,
        }
    }
}
