//! Adapters layer: Concrete implementations of ports.
//!
//! - `logistic`: JSON logistic-regression artifact implementing `Classifier`

pub mod logistic;

// Re-export artifact error for lib.rs
pub use logistic::ArtifactError;
