//! Step definitions for recommendation behaviour scenarios.

mod given;
mod when;
pub mod world;
