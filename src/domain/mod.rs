//! Domain layer: Core business types and logic.
//!
//! Pure Rust types with no I/O: the static field table, raw input,
//! the feature vector and its builder, and the prediction outcome.

mod builder;
pub mod field;
mod prediction;
mod raw;
mod vector;

pub use builder::{BuildError, FeatureVectorBuilder, ValidationError, ValidationReason};
pub use field::{CategoryOption, FieldKind, FieldSpec, FEATURE_COUNT, FEATURE_NAMES, FIELD_SPECS};
pub use prediction::{Assessment, Prediction};
pub use raw::{RawValue, RawValues};
pub use vector::FeatureVector;
