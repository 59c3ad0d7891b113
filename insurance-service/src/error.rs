use crate::models::ClaimStatus;
use error_common::{codes, CodedError, ErrorCategory};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum InsuranceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Claim not found: {0}")]
    ClaimNotFound(Uuid),

    #[error("Claim cannot move from {from} to {to}")]
    InvalidTransition { from: ClaimStatus, to: ClaimStatus },

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Claim gateway error: {0}")]
    Gateway(String),
}

impl CodedError for InsuranceError {
    fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => codes::validation::INVALID_INPUT,
            Self::ClaimNotFound(_) => codes::insurance::CLAIM_NOT_FOUND,
            Self::InvalidTransition { .. } => codes::insurance::INVALID_TRANSITION,
            Self::Repository(_) => codes::storage::REPOSITORY_FAILURE,
            Self::Gateway(_) => codes::insurance::GATEWAY_FAILURE,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::ClaimNotFound(_) => ErrorCategory::NotFound,
            Self::InvalidTransition { .. } => ErrorCategory::Conflict,
            Self::Repository(_) => ErrorCategory::Storage,
            Self::Gateway(_) => ErrorCategory::External,
        }
    }
}

pub type InsuranceResult<T> = Result<T, InsuranceError>;
