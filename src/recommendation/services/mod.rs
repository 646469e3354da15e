//! Application services for engineer recommendation.

mod availability;
mod engine;
mod explanation;
mod registry;

pub use availability::AvailabilityGate;
pub use engine::{RecommendationEngine, RecommendationResult};
pub use registry::ProfileRegistry;
