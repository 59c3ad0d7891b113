//! Configuration management for the hospital billing engine
//!
//! Configuration is layered with the `config` crate:
//!
//! - **Defaults**: a serialized `Default` value of the target struct
//! - **Local Files**: YAML, TOML or JSON, picked by extension
//! - **Environment Variables**: `BILLING__TAX_RATE=0.12` style overrides
//!
//! # Example
//!
//! ```rust,no_run
//! use config_engine::ConfigEngine;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize)]
//! struct AppConfig {
//!     log_level: String,
//! }
//!
//! let config: AppConfig = ConfigEngine::new()
//!     .with_defaults(&AppConfig::default())?
//!     .add_optional_file("billing.yaml")
//!     .with_env_prefix("BILLING")
//!     .load()?;
//! # Ok::<(), config_engine::ConfigError>(())
//! ```

pub mod engine;
pub mod error;
pub mod validation;

pub use engine::*;
pub use error::*;
pub use validation::*;
