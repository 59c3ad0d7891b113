use crate::context::ErrorContext;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad classification shared by every service error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Missing or invalid input; the user re-enters the field
    Validation,
    /// Cash tendered below the amount due
    InsufficientAmount,
    /// Claim or record lookup failures
    NotFound,
    /// Rejected state change on a stored record
    Conflict,
    /// External collaborator (payment gateway, claim gateway) failed
    External,
    /// Storage backend failure
    Storage,
    /// Configuration could not be loaded or validated
    Configuration,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::InsufficientAmount => "insufficient_amount",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::External => "external",
            Self::Storage => "storage",
            Self::Configuration => "configuration",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every service error enum so callers can react uniformly
pub trait CodedError: std::error::Error {
    /// Stable error code, see [`crate::codes`]
    fn code(&self) -> &'static str;

    fn category(&self) -> ErrorCategory;

    /// Whether the failure is recovered locally by asking the user to correct input.
    /// Nothing is retried automatically.
    fn is_user_correctable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Validation | ErrorCategory::InsufficientAmount
        )
    }
}

/// Emit a structured error event for a coded error
pub fn log_error<E: CodedError + ?Sized>(context: &ErrorContext, error: &E) {
    if error.is_user_correctable() {
        tracing::warn!(
            error_code = error.code(),
            category = %error.category(),
            context = %context.to_json(),
            "{}",
            error
        );
    } else {
        tracing::error!(
            error_code = error.code(),
            category = %error.category(),
            context = %context.to_json(),
            "{}",
            error
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Error, Debug)]
    enum SampleError {
        #[error("missing field")]
        Missing,
        #[error("backend down")]
        Backend,
    }

    impl CodedError for SampleError {
        fn code(&self) -> &'static str {
            match self {
                Self::Missing => crate::codes::validation::MISSING_REQUIRED_FIELD,
                Self::Backend => crate::codes::storage::REPOSITORY_FAILURE,
            }
        }

        fn category(&self) -> ErrorCategory {
            match self {
                Self::Missing => ErrorCategory::Validation,
                Self::Backend => ErrorCategory::Storage,
            }
        }
    }

    #[test]
    fn test_user_correctable_follows_category() {
        assert!(SampleError::Missing.is_user_correctable());
        assert!(!SampleError::Backend.is_user_correctable());
    }

    #[test]
    fn test_log_error_accepts_context() {
        let ctx = ErrorContext::new()
            .with_operation("reconcile_payment")
            .add_context("method", "cash");
        log_error(&ctx, &SampleError::Missing);
        assert!(ctx.to_json().contains("reconcile_payment"));
    }
}
