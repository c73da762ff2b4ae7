//! Storage-level errors and their mapping into core errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use btmirror_core::errors::{DatabaseError, Error};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Query failed: {0}")]
    Query(#[from] DieselError),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    /// A stored column could not be parsed back into its domain type
    #[error("Invalid value in column {column}: {value}")]
    InvalidValue { column: &'static str, value: String },

    #[error("Writer unavailable: {0}")]
    Writer(String),
}

impl StorageError {
    pub fn invalid_value(column: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            column,
            value: value.into(),
        }
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        let database_error = match err {
            StorageError::Query(DieselError::DatabaseError(kind, info)) => match kind {
                DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::NotNullViolation
                | DatabaseErrorKind::CheckViolation => {
                    DatabaseError::ConstraintViolation(info.message().to_string())
                }
                _ => DatabaseError::QueryFailed(info.message().to_string()),
            },
            StorageError::Query(other) => DatabaseError::QueryFailed(other.to_string()),
            StorageError::Pool(err) => DatabaseError::ConnectionFailed(err.to_string()),
            StorageError::Connection(message) => DatabaseError::ConnectionFailed(message),
            StorageError::Migration(message) => DatabaseError::MigrationFailed(message),
            err @ StorageError::InvalidValue { .. } => DatabaseError::InvalidValue(err.to_string()),
            StorageError::Writer(message) => DatabaseError::Internal(message),
        };
        Error::Database(database_error)
    }
}
