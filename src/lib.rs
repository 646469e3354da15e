//! Torque: engineer dispatch for a vehicle maintenance workshop.
//!
//! This crate assigns workshop tasks to engineers using their historical
//! performance and live availability, estimates task durations from
//! personal history and experience, and tracks each task from creation to
//! completion.
//!
//! # Architecture
//!
//! Torque follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage
//! - **Adapters**: Concrete implementations of ports (in-memory store)
//! - **Services**: Orchestration over ports, generic over storage and clock
//!
//! # Modules
//!
//! - [`workshop`]: Engineers, task catalogue, jobs, history and lifecycle
//! - [`recommendation`]: Historical profiles, suitability scoring, ranking
//! - [`estimation`]: Experience-weighted task-duration estimates
//! - [`config`]: Tunable weights, bounds and tie-break policy

pub mod config;
pub mod estimation;
pub mod recommendation;
pub mod workshop;

mod stats;

#[cfg(test)]
mod test_support;
