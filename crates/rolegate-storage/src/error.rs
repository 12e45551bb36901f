//! Storage error types.

use std::time::Duration;

use thiserror::Error;

/// Storage-specific errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database connection error.
    #[error("database connection error: {message}")]
    ConnectionError { message: String },

    /// Database query error.
    #[error("database query error: {message}")]
    QueryError { message: String },

    /// Query exceeded the configured storage timeout.
    #[error("query timeout: {operation} exceeded {timeout:?}")]
    QueryTimeout { operation: String, timeout: Duration },

    /// Transaction error.
    #[error("transaction error: {message}")]
    TransactionError { message: String },

    /// A concurrent writer changed the rule table while saving.
    #[error("write conflict: {message}")]
    WriteConflict { message: String },

    /// A persisted row does not decode into a permission or grouping rule.
    #[error("malformed policy record: {message}")]
    MalformedRecord { message: String },

    /// Invalid input error.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Health probe failed.
    #[error("health check failed: {message}")]
    HealthCheckFailed { message: String },
}

impl StorageError {
    /// Whether the error means the backing storage could not be reached or
    /// did not answer, as opposed to a data or input problem.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            StorageError::ConnectionError { .. }
                | StorageError::QueryError { .. }
                | StorageError::QueryTimeout { .. }
                | StorageError::TransactionError { .. }
                | StorageError::HealthCheckFailed { .. }
        )
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
