use crate::error::{ConfigError, Result};
use crate::validation::ConfigValidator;
use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use tracing::debug;

/// Environment prefix used when none is given
pub const DEFAULT_ENV_PREFIX: &str = "BILLING";

/// Layered configuration loader.
///
/// Sources are applied in the order they are added, later sources winning:
/// serialized defaults, then files, then environment variables.
pub struct ConfigEngine {
    builder: ConfigBuilder<DefaultState>,
    env_prefix: Option<String>,
}

impl ConfigEngine {
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: None,
        }
    }

    /// Seed the configuration with a serialized default value
    ///
    /// # Errors
    ///
    /// Fails when `defaults` cannot be represented as a configuration tree.
    pub fn with_defaults<T: Serialize>(mut self, defaults: &T) -> Result<Self> {
        let source = Config::try_from(defaults).map_err(|e| ConfigError::Defaults(e.to_string()))?;
        self.builder = self.builder.add_source(source);
        Ok(self)
    }

    /// Add a required file; the format is taken from its extension (yaml, toml, json)
    pub fn add_file(mut self, path: impl AsRef<Path>) -> Self {
        debug!(path = %path.as_ref().display(), "Adding configuration file");
        self.builder = self.builder.add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Add a file that is skipped when it does not exist
    pub fn add_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        self.builder = self.builder.add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Read `PREFIX__KEY` environment variables (nested keys separated by `__`)
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Build and deserialize the layered configuration
    ///
    /// # Errors
    ///
    /// Fails when a required source is missing or the merged tree does not match `T`.
    pub fn load<T: DeserializeOwned>(self) -> Result<T> {
        let mut builder = self.builder;
        if let Some(prefix) = self.env_prefix {
            builder = builder.add_source(
                Environment::with_prefix(&prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );
        }
        let loaded = builder.build()?.try_deserialize::<T>()?;
        Ok(loaded)
    }

    /// Like [`ConfigEngine::load`] and then run the value's validator
    ///
    /// # Errors
    ///
    /// Fails on load errors or when validation rejects the configuration.
    pub fn load_validated<T: DeserializeOwned + ConfigValidator>(self) -> Result<T> {
        let loaded: T = self.load()?;
        loaded.validate()?;
        Ok(loaded)
    }
}

impl Default for ConfigEngine {
    fn default() -> Self {
        Self::new()
    }
}
