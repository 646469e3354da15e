//! Dynamic task-duration estimation.
//!
//! An engineer's mean time on a task is blended with the task's standard
//! time. The blend weight grows with experience tier: junior engineers'
//! own history counts for 30%, seniors' for 50% and masters' for 70%.

mod domain;
mod estimator;

pub use domain::{
    EstimateSource, EstimationError, JobEstimate, StandardTimeSource, TaskEstimate, blend,
    round_minutes,
};
pub use estimator::{DynamicEstimator, EstimationResult};

#[cfg(test)]
mod tests;
