//! Persistence gateways over the SQLite store.
//!
//! # Responsibility
//! - Define per-entity CRUD contracts keyed by UUID.
//! - Keep SQL and row mapping inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate records before SQL mutations.
//! - A lookup miss is `Ok(None)`; update/delete of a missing row is
//!   `RepoError::NotFound`.
//! - Read paths reject malformed persisted rows instead of masking them.

pub mod action_step_repo;
pub mod check_in_repo;
pub mod goal_repo;
pub mod higher_goal_repo;
pub mod preference_repo;
mod record;
pub mod review_repo;

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::goal::GoalValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by every gateway.
#[derive(Debug)]
pub enum RepoError {
    /// Record failed domain validation before write.
    Validation(String),
    Db(DbError),
    /// Update/delete target does not exist.
    NotFound(Uuid),
    /// Persisted row cannot be mapped back to a record.
    InvalidData(String),
    /// Connection was not bootstrapped through `db::open_db*`.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "validation failed: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GoalValidationError> for RepoError {
    fn from(value: GoalValidationError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Rejects connections whose schema is not at the latest migration.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = current_version(conn)?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}
