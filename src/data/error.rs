//! Storage errors
//!
//! Wraps `sea_orm::DbErr` and pulls out the cases the route layer reacts to
//! differently from a plain database failure.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Errors raised by the storage layer.
#[derive(Error, Debug)]
pub enum StorageError {
    /// A unique index or constraint rejected the write.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A favorite row with neither or both targets set.
    #[error("favorite {id} must reference exactly one planet or person")]
    MalformedFavorite { id: i32 },

    /// `begin()` called before `connect()`.
    #[error("database connection has not been opened")]
    NotConnected,

    #[error("database error: {0}")]
    Database(#[source] DbErr),
}

impl From<DbErr> for StorageError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => StorageError::UniqueViolation(detail),
            _ => StorageError::Database(err),
        }
    }
}
