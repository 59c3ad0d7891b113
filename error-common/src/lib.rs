//! Common error handling utilities for the hospital billing engine
//!
//! Every service crate defines its own `thiserror` enum and implements
//! [`CodedError`] so that callers (a view layer, an API, the CLI) can map
//! any failure to a stable code and decide whether to re-prompt the user.
//!
//! # Error Categories
//!
//! - **Validation**: missing or invalid required fields
//! - **InsufficientAmount**: cash tendered below the amount due
//! - **NotFound / Conflict**: claim record lookups and status changes
//! - **External**: payment or claim gateway failures
//! - **Storage / Configuration**: infrastructure failures
//!
//! # Example
//!
//! ```rust
//! use error_common::{log_error, ErrorContext};
//! # use error_common::{CodedError, ErrorCategory};
//! # #[derive(Debug)] struct Missing;
//! # impl std::fmt::Display for Missing { fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str("missing") } }
//! # impl std::error::Error for Missing {}
//! # impl CodedError for Missing {
//! #     fn code(&self) -> &'static str { error_common::codes::validation::MISSING_REQUIRED_FIELD }
//! #     fn category(&self) -> ErrorCategory { ErrorCategory::Validation }
//! # }
//!
//! let ctx = ErrorContext::new().with_operation("build_line_item");
//! log_error(&ctx, &Missing);
//! ```

pub mod codes;
pub mod context;
pub mod types;

pub use context::*;
pub use types::*;
