//! Fixed-order numeric encoding of one submission.

use serde::Serialize;

use super::field::{field_spec, FEATURE_COUNT};

/// Ordered feature values, one per declared field.
///
/// Only the builder creates these, so every instance has passed validation.
/// Order: age, sex, chest_pain_type, resting_bp, cholesterol,
/// fasting_blood_sugar, resting_ecg, max_heart_rate, exercise_angina,
/// st_depression, st_slope, vessels_colored, thalassemia.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub(crate) fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Convert to a vector for ML inference.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }

    #[must_use]
    pub fn into_array(self) -> [f64; FEATURE_COUNT] {
        self.0
    }

    /// Value of a named field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        field_spec(name).map(|spec| self.0[spec.position])
    }
}
