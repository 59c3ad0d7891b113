use error_common::{codes, CodedError, ErrorCategory};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration source could not be loaded: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Configuration defaults could not be serialized: {0}")]
    Defaults(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl CodedError for ConfigError {
    fn code(&self) -> &'static str {
        codes::config::INVALID_CONFIGURATION
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
