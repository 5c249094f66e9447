//! Logistic adapter: Implementation of `Classifier` backed by a JSON artifact.
//!
//! The artifact carries standardized logistic-regression parameters exported
//! by an external training pipeline:
//!
//! ```text
//! z = intercept + Σ coef[i] * (x[i] - mean[i]) / scale[i]
//! p = 1 / (1 + e^-z)
//! label = 1 if p >= threshold else 0
//! ```
//!
//! # Integrity
//!
//! - `feature_names` must list the feature vector order exactly; an artifact
//!   trained on a different order is refused at load time.
//! - An expected SHA-256 digest can be pinned (`CARDIOCHECK_MODEL_SHA256`).
//!   When pinned, the file bytes are hashed before parsing and compared in
//!   constant time.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{FeatureVector, Prediction, FEATURE_COUNT, FEATURE_NAMES};
use crate::ports::{Classifier, InferenceError};

/// Only artifact layout understood by this adapter.
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

const DEFAULT_THRESHOLD: f64 = 0.5;

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// Errors raised while loading the model artifact. All are start-up fatal.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Model file {0:?} not found")]
    Missing(PathBuf),

    #[error("Failed to read model file {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Model file digest mismatch (expected {expected}, got {actual})")]
    DigestMismatch { expected: String, actual: String },

    #[error("Invalid model format: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unsupported model format version {0} (expected {})", SUPPORTED_FORMAT_VERSION)]
    UnsupportedVersion(u32),

    #[error("Model incompatible with feature vector: {0}")]
    Incompatible(String),
}

/// Model parameters as exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticArtifact {
    pub format_version: u32,
    pub model_version: String,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub scaler_mean: Option<Vec<f64>>,
    #[serde(default)]
    pub scaler_scale: Option<Vec<f64>>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LogisticArtifact {
    /// Check the artifact against the feature vector contract.
    ///
    /// # Errors
    /// Returns `UnsupportedVersion` or `Incompatible`.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion(self.format_version));
        }

        if self.feature_names.len() != FEATURE_COUNT
            || self
                .feature_names
                .iter()
                .zip(FEATURE_NAMES.iter())
                .any(|(declared, expected)| declared != expected)
        {
            return Err(ArtifactError::Incompatible(format!(
                "feature_names must be exactly {FEATURE_NAMES:?}, got {:?}",
                self.feature_names
            )));
        }

        check_params("coefficients", &self.coefficients)?;
        if let Some(mean) = &self.scaler_mean {
            check_params("scaler_mean", mean)?;
        }
        if let Some(scale) = &self.scaler_scale {
            check_params("scaler_scale", scale)?;
            if scale.iter().any(|s| *s == 0.0) {
                return Err(ArtifactError::Incompatible(
                    "scaler_scale contains zero".into(),
                ));
            }
        }

        if !self.intercept.is_finite() {
            return Err(ArtifactError::Incompatible("intercept is not finite".into()));
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(ArtifactError::Incompatible(format!(
                "threshold {} must lie strictly between 0 and 1",
                self.threshold
            )));
        }

        Ok(())
    }
}

fn check_params(name: &str, values: &[f64]) -> Result<(), ArtifactError> {
    if values.len() != FEATURE_COUNT {
        return Err(ArtifactError::Incompatible(format!(
            "{name} has {} entries, expected {FEATURE_COUNT}",
            values.len()
        )));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ArtifactError::Incompatible(format!(
            "{name} contains non-finite values"
        )));
    }
    Ok(())
}

fn sha256_hex_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

// Constant-time compare for ASCII strings (used for SHA-256 hex digests).
fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes().iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Logistic regression classifier loaded from a JSON artifact.
#[derive(Debug, Clone)]
pub struct LogisticClassifier {
    artifact: LogisticArtifact,
}

impl LogisticClassifier {
    /// Load and validate an artifact from disk.
    ///
    /// # Errors
    /// Returns `ArtifactError` if the file is missing, unreadable, does not
    /// match the pinned digest, or is not a compatible artifact.
    pub fn load(path: &Path, expected_sha256: Option<&str>) -> Result<Self, ArtifactError> {
        let bytes = std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ArtifactError::Missing(path.to_path_buf())
            } else {
                ArtifactError::Unreadable {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        match expected_sha256 {
            Some(expected) => {
                let expected = expected.trim().to_ascii_lowercase();
                let actual = sha256_hex_bytes(&bytes);
                if !constant_time_eq_str(&actual, &expected) {
                    return Err(ArtifactError::DigestMismatch { expected, actual });
                }
            }
            None => tracing::warn!("Loading model {:?} without a pinned digest", path),
        }

        let artifact: LogisticArtifact = serde_json::from_slice(&bytes)?;
        let classifier = Self::from_artifact(artifact)?;

        tracing::info!(
            "Loaded model from {:?} (version={}, threshold={})",
            path,
            classifier.artifact.model_version,
            classifier.artifact.threshold
        );

        Ok(classifier)
    }

    /// Wrap already-parsed parameters.
    ///
    /// # Errors
    /// Returns `ArtifactError` if the parameters fail validation.
    pub fn from_artifact(artifact: LogisticArtifact) -> Result<Self, ArtifactError> {
        artifact.validate()?;
        Ok(Self { artifact })
    }

    #[must_use]
    pub fn artifact(&self) -> &LogisticArtifact {
        &self.artifact
    }

    /// Probability of the positive class for a raw feature slice.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if `features` does not have one value per
    /// declared feature, `NonFiniteScore` if the score overflows.
    pub fn probability(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.artifact.coefficients.len() {
            return Err(InferenceError::ShapeMismatch {
                expected: self.artifact.coefficients.len(),
                got: features.len(),
            });
        }

        let a = &self.artifact;
        let mut z = a.intercept;
        for (i, x) in features.iter().enumerate() {
            let mean = a.scaler_mean.as_ref().map_or(0.0, |m| m[i]);
            let scale = a.scaler_scale.as_ref().map_or(1.0, |s| s[i]);
            z += a.coefficients[i] * (x - mean) / scale;
        }

        if !z.is_finite() {
            return Err(InferenceError::NonFiniteScore);
        }
        Ok(sigmoid(z))
    }

    /// Classify a raw feature slice.
    ///
    /// # Errors
    /// See [`LogisticClassifier::probability`].
    pub fn predict_slice(&self, features: &[f64]) -> Result<Prediction, InferenceError> {
        let p = self.probability(features)?;
        let label = i64::from(p >= self.artifact.threshold);
        Prediction::try_from(label)
    }
}

impl Classifier for LogisticClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<Prediction, InferenceError> {
        self.predict_slice(features.as_slice())
    }

    fn model_version(&self) -> &str {
        &self.artifact.model_version
    }
}
