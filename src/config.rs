//! Process configuration from `CARDIOCHECK_*` environment variables.
//!
//! Command line flags in the binary override these values.

use std::path::PathBuf;

use crate::CardiocheckError;

pub const MODEL_PATH_ENV: &str = "CARDIOCHECK_MODEL_PATH";
pub const MODEL_SHA256_ENV: &str = "CARDIOCHECK_MODEL_SHA256";
pub const STRICT_DIGEST_ENV: &str = "CARDIOCHECK_STRICT_DIGEST";
pub const LOG_MODE_ENV: &str = "CARDIOCHECK_LOG_MODE";
pub const LOG_FILE_ENV: &str = "CARDIOCHECK_LOG_FILE";

pub const DEFAULT_MODEL_PATH: &str = "models/best_model.json";
pub const DEFAULT_LOG_FILE: &str = "cardiocheck.log";

/// Where log output goes. stdout is reserved for the result message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    Stderr,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub model_path: PathBuf,
    /// Expected SHA-256 of the model file (hex)
    pub model_sha256: Option<String>,
    /// Refuse to load a model without a pinned digest
    pub strict_digest: bool,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

pub fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "yes" | "YES")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let log_mode = match get(LOG_MODE_ENV).as_deref().map(str::trim) {
            Some("file") => LogMode::File,
            _ => LogMode::Stderr,
        };

        Self {
            model_path: get(MODEL_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            model_sha256: get(MODEL_SHA256_ENV).map(|v| v.trim().to_string()),
            strict_digest: get(STRICT_DIGEST_ENV).is_some_and(|v| parse_bool(&v)),
            log_mode,
            log_file: get(LOG_FILE_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }

    /// Digest to verify the model against.
    ///
    /// # Errors
    /// Returns `Configuration` when strict mode is on and no digest is pinned.
    pub fn expected_digest(&self) -> Result<Option<&str>, CardiocheckError> {
        match (&self.model_sha256, self.strict_digest) {
            (Some(d), _) => Ok(Some(d.as_str())),
            (None, true) => Err(CardiocheckError::Configuration(format!(
                "{STRICT_DIGEST_ENV} is set but {MODEL_SHA256_ENV} is missing"
            ))),
            (None, false) => Ok(None),
        }
    }
}
