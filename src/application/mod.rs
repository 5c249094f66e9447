//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the single use case of the application: one screening request.

mod assessment;

pub use assessment::AssessmentService;
