// Logger configuration
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub log_level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
    /// When set, logs are also written to a daily rolling file in this directory
    pub log_dir: Option<PathBuf>,
    pub redaction_enabled: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            log_dir: None,
            redaction_enabled: true,
        }
    }
}
