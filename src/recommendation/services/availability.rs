//! Live view of which engineers can take work.

use crate::workshop::{
    domain::EngineerId,
    ports::{EngineerRepository, WorkshopRepositoryResult},
};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Reads the current availability set from engineer storage.
#[derive(Clone)]
pub struct AvailabilityGate<R>
where
    R: EngineerRepository,
{
    repository: Arc<R>,
}

impl<R> AvailabilityGate<R>
where
    R: EngineerRepository,
{
    /// Creates a gate over the engineer repository.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns the engineers whose availability is `Yes` right now.
    ///
    /// Storage is read on every call; nothing is cached.
    ///
    /// # Errors
    ///
    /// Propagates the repository error unchanged. A failed read is never
    /// reported as an empty set.
    pub async fn available_engineers(&self) -> WorkshopRepositoryResult<BTreeSet<EngineerId>> {
        let ids = self.repository.available_engineer_ids().await?;
        Ok(ids.into_iter().collect())
    }
}
