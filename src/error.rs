//! Custom error types for the tuition ledger
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// Failure of the "mark obligation as paid" write path
///
/// None of these are fatal: the read side keeps working from the last
/// snapshot, and the caller decides whether to retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// Rejected locally before anything was submitted
    #[error("Invalid payment: {0}")]
    Invalid(String),

    /// The data layer answered but refused the payment (e.g. duplicate)
    #[error("Payment rejected: {0}")]
    Rejected(String),

    /// The data layer could not be reached or failed to persist
    #[error("Payment could not be submitted: {0}")]
    Transport(String),
}

impl PaymentError {
    /// Whether resubmitting the same payment may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Human-readable reason without the category prefix
    pub fn reason(&self) -> &str {
        match self {
            Self::Invalid(reason) | Self::Rejected(reason) | Self::Transport(reason) => reason,
        }
    }
}

/// The main error type for tuition ledger operations
#[derive(Error, Debug)]
pub enum TuitionError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// A timestamp on a record could not be parsed
    #[error("Invalid {field} '{value}' on {entity}")]
    DateParse {
        entity: String,
        field: &'static str,
        value: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Write-path failures
    #[error(transparent)]
    Payment(#[from] PaymentError),
}

impl TuitionError {
    /// Create a "not found" error for students
    pub fn student_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Student",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for courses
    pub fn course_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Course",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<std::io::Error> for TuitionError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TuitionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for TuitionError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for tuition ledger operations
pub type TuitionResult<T> = Result<T, TuitionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TuitionError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = TuitionError::student_not_found("s-42");
        assert_eq!(err.to_string(), "Student not found: s-42");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_date_parse_error() {
        let err = TuitionError::DateParse {
            entity: "student s-1".into(),
            field: "createdAt",
            value: "yesterday".into(),
        };
        assert_eq!(err.to_string(), "Invalid createdAt 'yesterday' on student s-1");
    }

    #[test]
    fn test_payment_error_retryable() {
        assert!(PaymentError::Transport("disk full".into()).is_retryable());
        assert!(!PaymentError::Rejected("duplicate".into()).is_retryable());
        assert!(!PaymentError::Invalid("zero amount".into()).is_retryable());
        assert_eq!(PaymentError::Rejected("duplicate".into()).reason(), "duplicate");
    }

    #[test]
    fn test_payment_error_is_transparent() {
        let err: TuitionError = PaymentError::Rejected("already paid".into()).into();
        assert_eq!(err.to_string(), "Payment rejected: already paid");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TuitionError = io_err.into();
        assert!(matches!(err, TuitionError::Io(_)));
    }
}
