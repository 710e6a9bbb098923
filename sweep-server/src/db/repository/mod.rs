//! Repository Module
//!
//! CRUD operations over the embedded SurrealDB tables.

pub mod ticket;
pub mod user;

// Re-exports
pub use ticket::{TicketFilter, TicketRepository};
pub use user::UserRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:id" strings across the stack
// =============================================================================
//
// API paths accept either the full "table:id" form or the bare key; bare keys
// are qualified with the repository's table before use.

/// Parse an id string into a RecordId for the given table
pub(crate) fn record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    if id.contains(':') {
        let rid: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        if rid.table() != table {
            return Err(RepoError::Validation(format!(
                "Expected a {} ID, got: {}",
                table, id
            )));
        }
        Ok(rid)
    } else {
        Ok(RecordId::from_table_key(table, id))
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
