//! Repository layer: the data-access core and one store per entity family.
//!
//! # Responsibility
//! - Build every statement through the shared soft-delete filter.
//! - Run unbounded-cost reads through the bounded query executor.
//! - Decide insert vs. update for singleton-per-owner entities.
//!
//! # Invariants
//! - Not-found is never an error: reads yield `None`, writes yield `false`.
//! - All other failures propagate unchanged; nothing is retried here.

pub mod address_repo;
pub mod bounded;
pub mod bus_repo;
pub mod contact_repo;
pub mod shared_vehicle_repo;
pub mod soft_delete;
pub mod upsert;
pub mod user_repo;

use crate::db::DbError;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure taxonomy of the data-access core.
#[derive(Debug)]
pub enum StoreError {
    /// Driver, pool or engine failure. Propagated verbatim.
    Execution(DbError),
    /// Engine-reported referential or uniqueness violation.
    Constraint(rusqlite::Error),
    /// A bounded read did not finish before its deadline.
    Timeout { label: &'static str, waited_ms: u128 },
    /// The background unit of a bounded read could not run or died silently.
    Worker(String),
    /// Persisted row cannot be mapped back to a model value.
    InvalidData(String),
}

impl StoreError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Execution(err) => write!(f, "{err}"),
            Self::Constraint(err) => write!(f, "constraint violation: {err}"),
            Self::Timeout { label, waited_ms } => {
                write!(f, "query `{label}` timed out after {waited_ms}ms")
            }
            Self::Worker(message) => write!(f, "bounded query worker failed: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Execution(err) => Some(err),
            Self::Constraint(err) => Some(err),
            Self::Timeout { .. } => None,
            Self::Worker(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        if value.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
            Self::Constraint(value)
        } else {
            Self::Execution(DbError::Sqlite(value))
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => err.into(),
            other => Self::Execution(other),
        }
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(value: r2d2::Error) -> Self {
        Self::Execution(DbError::Pool(value))
    }
}
