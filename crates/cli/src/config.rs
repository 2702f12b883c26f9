//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `NARRA_CATALOG` - Path to the catalog JSON file
//!
//! ## Optional
//! - `NARRA_AUDIT_LOG` - Path to the audit trail JSONL file (default: narra-audit.jsonl)
//! - `NARRA_ACTOR` - Operator name stamped on audit entries (default: admin)

use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Catalog file every command loads from and saves to
    pub catalog_path: PathBuf,
    /// File mutation commands append audit entries to, one JSON object per line
    pub audit_log_path: PathBuf,
    /// Operator name stamped on audit entries
    pub actor: String,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `NARRA_CATALOG` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            catalog_path: PathBuf::from(get_required_env("NARRA_CATALOG")?),
            audit_log_path: PathBuf::from(get_env_or_default(
                "NARRA_AUDIT_LOG",
                "narra-audit.jsonl",
            )),
            actor: get_env_or_default("NARRA_ACTOR", "admin"),
        })
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
