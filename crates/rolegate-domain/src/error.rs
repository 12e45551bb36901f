//! Domain error types for authorization operations.

use rolegate_storage::StorageError;
use thiserror::Error;

/// Domain-specific errors for enforcement and policy mutation.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The rule store could not be read or written.
    #[error("rule store unavailable: {0}")]
    StoreUnavailable(#[source] StorageError),

    /// A concurrent writer changed the durable rule set during `save`.
    #[error("write conflict: {message}")]
    WriteConflict { message: String },

    /// The rule to update does not exist.
    #[error("rule not found: {rule}")]
    RuleNotFound { rule: String },

    /// A rule was rejected before touching the store.
    #[error("malformed rule: {field} {reason}")]
    MalformedRule { field: String, reason: String },

    /// The decision could not be computed from the loaded policy.
    #[error("evaluation error: {message}")]
    EvaluationError { message: String },
}

impl DomainError {
    /// Whether the error means no decision could be reached.
    ///
    /// Callers must surface these as a failure (5xx-class), never as a deny.
    pub fn is_evaluation_failure(&self) -> bool {
        matches!(
            self,
            DomainError::StoreUnavailable(_) | DomainError::EvaluationError { .. }
        )
    }

    /// Whether the error was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DomainError::MalformedRule { .. } | DomainError::RuleNotFound { .. }
        )
    }
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::WriteConflict { message } => DomainError::WriteConflict { message },
            // Persisted rows that do not fit the model are a model fault.
            StorageError::MalformedRecord { message } => DomainError::EvaluationError { message },
            other => DomainError::StoreUnavailable(other),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_storage_faults_become_store_unavailable() {
        let err: DomainError = StorageError::QueryTimeout {
            operation: "load".to_string(),
            timeout: Duration::from_secs(5),
        }
        .into();
        assert!(matches!(err, DomainError::StoreUnavailable(_)));
        assert!(err.is_evaluation_failure());
        assert!(err.to_string().contains("load"));
    }

    #[test]
    fn test_write_conflict_is_preserved() {
        let err: DomainError = StorageError::WriteConflict {
            message: "duplicate key".to_string(),
        }
        .into();
        assert!(matches!(err, DomainError::WriteConflict { .. }));
        assert!(!err.is_evaluation_failure());
    }

    #[test]
    fn test_malformed_record_is_evaluation_error() {
        let err: DomainError = StorageError::MalformedRecord {
            message: "unknown ptype 'p2'".to_string(),
        }
        .into();
        assert!(matches!(err, DomainError::EvaluationError { .. }));
        assert!(err.is_evaluation_failure());
    }

    #[test]
    fn test_client_errors() {
        let err = DomainError::MalformedRule {
            field: "object".to_string(),
            reason: "must start with '/'".to_string(),
        };
        assert!(err.is_client_error());
        assert!(!err.is_evaluation_failure());
        assert_eq!(err.to_string(), "malformed rule: object must start with '/'");
    }
}
