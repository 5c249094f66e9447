//! # cardiocheck
//!
//! Heart disease screening from thirteen clinical measurements.
//!
//! This crate provides:
//! - A static table of field specifications (domains, categorical ordinals,
//!   vector positions)
//! - Deterministic, all-or-nothing construction of the fixed-order feature
//!   vector consumed by a pre-trained classifier
//! - A per-request assessment service that validates, classifies once and
//!   maps the label to a message
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Field table, raw input, feature vector builder, prediction
//! - `ports`: The `Classifier` capability
//! - `adapters`: JSON logistic-regression artifact
//! - `application`: Assessment request handler
//! - `config`: Environment configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use domain::{
    Assessment, BuildError, FeatureVector, FeatureVectorBuilder, FieldSpec, Prediction, RawValue,
    RawValues, ValidationError,
};

/// Result type for cardiocheck operations
pub type Result<T> = std::result::Result<T, CardiocheckError>;

/// Main error type for cardiocheck
#[derive(Debug, thiserror::Error)]
pub enum CardiocheckError {
    /// Caller broke the input contract or the process is misconfigured.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Model not loaded: {0}")]
    ModelNotLoaded(#[from] adapters::ArtifactError),

    #[error("Invalid input: {0}")]
    Validation(#[from] domain::ValidationError),

    #[error("Failed to make prediction: {0}")]
    Inference(#[from] ports::InferenceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<BuildError> for CardiocheckError {
    fn from(e: BuildError) -> Self {
        match e {
            BuildError::Invalid(v) => Self::Validation(v),
            other => Self::Configuration(other.to_string()),
        }
    }
}

impl CardiocheckError {
    /// Whether the request can be resubmitted (after correcting input).
    ///
    /// Configuration and artifact errors are fatal for the process.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Inference(_))
    }
}
