use config_engine::ConfigError;
use error_common::{codes, CodedError, ErrorCategory};
use insurance_service::InsuranceError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation error: {0} is required")]
    MissingField(&'static str),

    #[error("Validation error: unknown service '{service}' in category '{category}'")]
    UnknownCatalogEntry { category: String, service: String },

    #[error("Insufficient amount: tendered {tendered}, due {due}")]
    InsufficientAmount { tendered: Decimal, due: Decimal },

    #[error("Insurance error: {0}")]
    Insurance(#[from] InsuranceError),

    #[error("Payment gateway error: {0}")]
    Gateway(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl BillingError {
    /// Any of the variants a user fixes by correcting a form field
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::MissingField(_) | Self::UnknownCatalogEntry { .. }
        )
    }
}

impl CodedError for BillingError {
    fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => codes::validation::INVALID_INPUT,
            Self::MissingField(_) => codes::validation::MISSING_REQUIRED_FIELD,
            Self::UnknownCatalogEntry { .. } => codes::validation::UNKNOWN_CATALOG_ENTRY,
            Self::InsufficientAmount { .. } => codes::payment::INSUFFICIENT_AMOUNT,
            Self::Insurance(e) => e.code(),
            Self::Gateway(_) => codes::payment::GATEWAY_FAILURE,
            Self::Config(e) => e.code(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) | Self::MissingField(_) | Self::UnknownCatalogEntry { .. } => {
                ErrorCategory::Validation
            }
            Self::InsufficientAmount { .. } => ErrorCategory::InsufficientAmount,
            Self::Insurance(e) => e.category(),
            Self::Gateway(_) => ErrorCategory::External,
            Self::Config(e) => e.category(),
        }
    }
}

pub type BillingResult<T> = Result<T, BillingError>;
