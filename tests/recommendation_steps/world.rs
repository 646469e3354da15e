//! Shared world state for recommendation BDD scenarios.

use std::sync::Arc;

use rstest::fixture;
use torque::estimation::{EstimationError, TaskEstimate};
use torque::recommendation::domain::{Recommendation, RecommendationError};
use torque::workshop::{adapters::memory::InMemoryWorkshop, domain::TaskCatalogue};

/// Scenario world for recommendation behaviour tests.
pub struct RecommendationWorld {
    pub workshop: Arc<InMemoryWorkshop>,
    pub catalogue: Arc<TaskCatalogue>,
    pub last_recommendation: Option<Result<Recommendation, RecommendationError>>,
    pub last_estimate: Option<Result<TaskEstimate, EstimationError>>,
}

impl RecommendationWorld {
    /// Creates a world over an empty workshop.
    #[must_use]
    pub fn new() -> Self {
        Self {
            workshop: Arc::new(InMemoryWorkshop::new()),
            catalogue: Arc::new(TaskCatalogue::standard()),
            last_recommendation: None,
            last_estimate: None,
        }
    }
}

impl Default for RecommendationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RecommendationWorld {
    RecommendationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
