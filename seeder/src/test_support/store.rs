//! In-memory user store and scripted connector doubles.
//!
//! [`InMemoryUserStore`] behaves like one session on a tiny database: the
//! table must be created before use, ids start at 1 and increase, and the
//! `(name, email)` pair is unique. Handles made with
//! [`InMemoryUserStore::reopen`] share the rows but track their own session.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::ports::{ConnectError, DatabaseConnector, UserStore, UserStoreError};
use crate::domain::{InsertOutcome, NewUser, User, UserId};

/// Operation that should fail on the next call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFault {
    /// `ensure_schema` fails.
    EnsureSchema,
    /// `insert_if_absent` fails.
    Insert,
    /// `list_users` fails.
    List,
    /// `close` fails.
    Close,
}

#[derive(Debug, Default)]
struct Database {
    schema: bool,
    next_id: i32,
    rows: Vec<User>,
}

/// Session on a shared in-memory `users` table.
///
/// Clones share the session: dropping any clone marks it closed, the way
/// dropping a real connection handle does.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    database: Arc<Mutex<Database>>,
    closed: Arc<AtomicBool>,
    fault: Option<StoreFault>,
}

impl InMemoryUserStore {
    /// Empty database without a `users` table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the given operation fail on this handle.
    #[must_use]
    pub fn with_fault(mut self, fault: StoreFault) -> Self {
        self.fault = Some(fault);
        self
    }

    /// New session on the same database.
    #[must_use]
    pub fn reopen(&self) -> Self {
        Self {
            database: Arc::clone(&self.database),
            closed: Arc::new(AtomicBool::new(false)),
            fault: None,
        }
    }

    /// Whether the `users` table has been created.
    pub fn schema_exists(&self) -> bool {
        self.lock().schema
    }

    /// Snapshot of stored rows in insertion order.
    pub fn rows(&self) -> Vec<User> {
        self.lock().rows.clone()
    }

    /// Write a row the way another client of the table might, bypassing
    /// candidate validation. Creates the table if needed.
    pub fn insert_raw(&self, name: Option<&str>, email: Option<&str>) -> UserId {
        let mut database = self.lock();
        database.schema = true;
        database.next_id += 1;
        let id = UserId::new(database.next_id);
        database.rows.push(User::new(
            id,
            name.map(str::to_owned),
            email.map(str::to_owned),
        ));
        id
    }

    /// Whether this session was closed or dropped.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Database> {
        self.database.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self, operation: StoreFault) -> Result<(), UserStoreError> {
        if self.is_closed() {
            return Err(UserStoreError::connection("session already closed"));
        }
        if self.fault == Some(operation) {
            return Err(UserStoreError::query(format!(
                "injected {operation:?} failure"
            )));
        }
        Ok(())
    }

    fn require_schema(database: &Database) -> Result<(), UserStoreError> {
        if database.schema {
            Ok(())
        } else {
            Err(UserStoreError::query("relation \"users\" does not exist"))
        }
    }
}

impl UserStore for InMemoryUserStore {
    fn ensure_schema(&mut self) -> Result<(), UserStoreError> {
        self.check(StoreFault::EnsureSchema)?;
        self.lock().schema = true;
        Ok(())
    }

    fn insert_if_absent(&mut self, user: &NewUser) -> Result<InsertOutcome, UserStoreError> {
        self.check(StoreFault::Insert)?;
        let mut database = self.lock();
        Self::require_schema(&database)?;
        if database.rows.iter().any(|row| row.matches(user)) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        database.next_id += 1;
        let id = UserId::new(database.next_id);
        database.rows.push(User::from_candidate(id, user));
        Ok(InsertOutcome::Inserted(id))
    }

    fn list_users(&mut self) -> Result<Vec<User>, UserStoreError> {
        self.check(StoreFault::List)?;
        let database = self.lock();
        Self::require_schema(&database)?;
        let mut rows = database.rows.clone();
        rows.sort_by_key(User::id);
        Ok(rows)
    }

    fn close(self) -> Result<(), UserStoreError> {
        self.check(StoreFault::Close)?;
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

impl Drop for InMemoryUserStore {
    fn drop(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Connector that fails a fixed number of times, then hands out sessions.
#[derive(Debug)]
pub struct ScriptedConnector {
    failures: u32,
    attempts: AtomicU32,
    store: InMemoryUserStore,
}

impl ScriptedConnector {
    /// Fail `failures` attempts, then open sessions on `store`.
    pub fn failing_then_ready(failures: u32, store: InMemoryUserStore) -> Self {
        Self {
            failures,
            attempts: AtomicU32::new(0),
            store,
        }
    }

    /// Attempts made so far.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl DatabaseConnector for ScriptedConnector {
    type Session = InMemoryUserStore;

    fn target(&self) -> String {
        "in-memory".to_owned()
    }

    fn connect(&self) -> Result<Self::Session, ConnectError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.failures {
            return Err(ConnectError::unreachable(format!(
                "scripted refusal on attempt {attempt}"
            )));
        }
        Ok(self.store.reopen())
    }
}
