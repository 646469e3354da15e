//! Engineer recommendation and suitability scoring.
//!
//! Historical task records are condensed into per-engineer, per-task
//! profiles. On each request the engine intersects the engineers with
//! history on the task with those currently available, scores them and
//! ranks the result:
//!
//! - Domain types in [`domain`]
//! - Scoring algorithms in [`scoring`]
//! - Orchestration services in [`services`]

pub mod domain;
pub mod scoring;
pub mod services;

#[cfg(test)]
mod tests;
