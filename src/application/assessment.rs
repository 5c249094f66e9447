//! Assessment service: Orchestrates one screening request.
//!
//! This service coordinates:
//! - Validation and encoding of raw input
//! - The classifier call
//! - Mapping of the label to a result
//!
//! Validation always completes before the classifier is touched.

use std::sync::Arc;

use crate::domain::{Assessment, FeatureVectorBuilder, FieldSpec, RawValues};
use crate::ports::Classifier;
use crate::CardiocheckError;

/// Request handler invoked once per form submission.
///
/// Holds no per-request state: the builder reads the static field table and
/// the classifier is shared read-only.
pub struct AssessmentService<C>
where
    C: Classifier,
{
    classifier: Arc<C>,
    builder: FeatureVectorBuilder,
}

impl<C> AssessmentService<C>
where
    C: Classifier,
{
    /// Create a new assessment service.
    pub fn new(classifier: Arc<C>) -> Self {
        Self {
            classifier,
            builder: FeatureVectorBuilder::new(),
        }
    }

    /// Field table for form rendering.
    #[must_use]
    pub fn fields(&self) -> &'static [FieldSpec] {
        self.builder.fields()
    }

    #[must_use]
    pub fn model_version(&self) -> &str {
        self.classifier.model_version()
    }

    /// Validate `raw`, run the classifier once, and return the outcome.
    ///
    /// # Errors
    /// Returns `Configuration` for a missing or undeclared field,
    /// `Validation` for a bad value (the classifier is not invoked in either
    /// case), or `Inference` if the classifier fails.
    pub fn assess(&self, raw: &RawValues) -> Result<Assessment, CardiocheckError> {
        tracing::info!("Starting assessment...");

        let features = self.builder.build(raw).map_err(|e| {
            tracing::warn!("Rejected submission: {}", e);
            CardiocheckError::from(e)
        })?;

        tracing::debug!("Feature vector built, invoking classifier");
        let prediction = self.classifier.predict(&features).map_err(|e| {
            tracing::error!("Inference failed: {}", e);
            CardiocheckError::Inference(e)
        })?;

        let assessment = Assessment::new(prediction, self.classifier.model_version());

        tracing::info!(
            "Assessment complete: prediction={} (label {}), model={}",
            assessment.prediction,
            assessment.prediction.label(),
            assessment.model_version
        );

        Ok(assessment)
    }
}
