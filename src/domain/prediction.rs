//! Prediction result types.
//!
//! Represents the output of the heart disease classifier.

use serde::{Deserialize, Serialize};

/// Binary classifier outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prediction {
    /// Label 0
    Unlikely,
    /// Label 1
    Likely,
}

impl Prediction {
    /// Map a classifier label. Only 0 and 1 are valid.
    #[must_use]
    pub fn from_label(label: i64) -> Option<Self> {
        match label {
            0 => Some(Self::Unlikely),
            1 => Some(Self::Likely),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(&self) -> u8 {
        match self {
            Self::Unlikely => 0,
            Self::Likely => 1,
        }
    }

    /// Message shown to the user.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Likely => {
                "The patient is likely to have heart disease. Further tests are recommended."
            }
            Self::Unlikely => "The patient is unlikely to have heart disease.",
        }
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unlikely => write!(f, "UNLIKELY"),
            Self::Likely => write!(f, "LIKELY"),
        }
    }
}

/// Outcome of one assessment request.
///
/// The feature vector itself is not retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub prediction: Prediction,

    /// Version string reported by the classifier
    pub model_version: String,

    pub assessed_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    #[must_use]
    pub fn new(prediction: Prediction, model_version: impl Into<String>) -> Self {
        Self {
            prediction,
            model_version: model_version.into(),
            assessed_at: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        self.prediction.message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_mapping() {
        assert_eq!(Prediction::from_label(0), Some(Prediction::Unlikely));
        assert_eq!(Prediction::from_label(1), Some(Prediction::Likely));
        assert_eq!(Prediction::from_label(2), None);
        assert_eq!(Prediction::from_label(-1), None);
        assert_eq!(Prediction::Likely.label(), 1);
        assert_eq!(Prediction::Unlikely.label(), 0);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            Prediction::Likely.message(),
            "The patient is likely to have heart disease. Further tests are recommended."
        );
        assert_eq!(
            Prediction::Unlikely.message(),
            "The patient is unlikely to have heart disease."
        );
    }

    #[test]
    fn test_assessment_creation() {
        let assessment = Assessment::new(Prediction::Likely, "v3");
        assert_eq!(assessment.model_version, "v3");
        assert_eq!(assessment.message(), Prediction::Likely.message());
        assert!(assessment.assessed_at <= chrono::Utc::now());
    }
}
