//! Logging for the hospital billing engine with redaction of payment details
//!
//! Payment forms carry card numbers, CVVs and UPI identifiers. Anything that
//! might contain them is passed through [`PiiRedactor`] before it reaches a
//! log sink, either explicitly via [`redact`] or through the
//! `redacted_info!` / `redacted_warn!` / `redacted_error!` macros.
//!
//! # Detected Data Types
//!
//! - **Card numbers**: 4111-1111-1111-1111 → ****-****-****-1111
//! - **CVV**: cvv: 123 → cvv=***
//! - **Email addresses** and **UPI identifiers**: hashed for correlation
//! - **Phone numbers**: Indian mobile numbers, with or without +91
//! - **Custom patterns**: configurable regex replacements
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_redacted::{init_logging, LoggerConfig};
//!
//! let _guard = init_logging(&LoggerConfig::default()).unwrap();
//! logger_redacted::redacted_info!("UPI collect request sent to {}", "ravi@okaxis");
//! ```

pub mod config;
pub mod macros;
pub mod redactor;

pub use config::*;
pub use redactor::*;

use lazy_static::lazy_static;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

lazy_static! {
    static ref DEFAULT_REDACTOR: PiiRedactor = PiiRedactor::default();
}

static REDACTION_ENABLED: AtomicBool = AtomicBool::new(true);

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Failed to install subscriber: {0}")]
    Install(String),
}

/// Redact a message with the default redaction rules
pub fn redact(text: &str) -> String {
    DEFAULT_REDACTOR.redact(text)
}

/// Redact a log message unless redaction was switched off in [`LoggerConfig`]
pub fn redact_for_log(text: &str) -> String {
    if REDACTION_ENABLED.load(Ordering::Relaxed) {
        redact(text)
    } else {
        text.to_string()
    }
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level`. When a log directory
/// is configured the returned guard must be kept alive for the file writer to
/// flush.
pub fn init_logging(config: &LoggerConfig) -> Result<Option<WorkerGuard>, LoggerError> {
    REDACTION_ENABLED.store(config.redaction_enabled, Ordering::Relaxed);

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)
            .map_err(|e| LoggerError::InvalidFilter(e.to_string()))?,
    };

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "billing.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = if config.json {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer().with_target(true).with_level(true).boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggerError::Install(e.to_string()))?;

    Ok(guard)
}
