//! Workshop floor: engineers, jobs and the task lifecycle.
//!
//! A job is opened from a service package, each of its tasks is assigned
//! to an engineer, started and completed. Completion moves the task into
//! the history that drives recommendation and estimation. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
