//! Classifier port: Trait for the pre-trained heart disease model.
//!
//! This trait abstracts the model artifact from the application logic.
//! The application never assumes an on-disk format; adapters decide that.

use crate::domain::{FeatureVector, Prediction};

/// Errors raised while running the classifier on a well-formed vector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("Feature count mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("Classifier produced a non-finite score")]
    NonFiniteScore,

    #[error("Classifier returned label {0}, expected 0 or 1")]
    InvalidLabel(i64),

    #[error("Classifier fault: {0}")]
    Fault(String),
}

impl TryFrom<i64> for Prediction {
    type Error = InferenceError;

    fn try_from(label: i64) -> Result<Self, Self::Error> {
        Prediction::from_label(label).ok_or(InferenceError::InvalidLabel(label))
    }
}

/// Trait for binary classification of a feature vector.
///
/// Implementations are loaded once at start-up and shared read-only, so
/// `predict` takes `&self` and must not keep per-call state.
pub trait Classifier: Send + Sync {
    /// Classify one vector.
    ///
    /// # Errors
    /// Returns `InferenceError` if the artifact cannot score this input.
    fn predict(&self, features: &FeatureVector) -> Result<Prediction, InferenceError>;

    /// Version of the loaded artifact, for logs and results.
    fn model_version(&self) -> &str {
        "unversioned"
    }
}
