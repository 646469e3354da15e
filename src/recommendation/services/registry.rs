//! Rebuildable holder for the current profile snapshot.

use crate::recommendation::domain::ProfileStore;
use crate::workshop::ports::{HistoryRepository, WorkshopRepositoryError, WorkshopRepositoryResult};
use std::sync::{Arc, RwLock};
use tracing::info;

/// Owns the current [`ProfileStore`] and swaps in a fresh one on rebuild.
///
/// Readers hold an `Arc` snapshot, so a rebuild never disturbs a request in
/// flight.
pub struct ProfileRegistry<H>
where
    H: HistoryRepository,
{
    history: Arc<H>,
    current: RwLock<Arc<ProfileStore>>,
}

impl<H> ProfileRegistry<H>
where
    H: HistoryRepository,
{
    /// Creates a registry holding an empty store. Call
    /// [`ProfileRegistry::rebuild`] to load history.
    #[must_use]
    pub fn new(history: Arc<H>) -> Self {
        Self::with_store(history, ProfileStore::default())
    }

    /// Creates a registry holding a prebuilt store.
    #[must_use]
    pub fn with_store(history: Arc<H>, store: ProfileStore) -> Self {
        Self {
            history,
            current: RwLock::new(Arc::new(store)),
        }
    }

    /// Creates a registry and builds it from current history.
    ///
    /// # Errors
    ///
    /// Returns the repository error when history cannot be read.
    pub async fn load(history: Arc<H>) -> WorkshopRepositoryResult<Self> {
        let registry = Self::new(history);
        registry.rebuild().await?;
        Ok(registry)
    }

    /// Rebuilds profiles from the full history and publishes them.
    ///
    /// # Errors
    ///
    /// Returns the repository error when history cannot be read; the
    /// previous snapshot stays in place.
    pub async fn rebuild(&self) -> WorkshopRepositoryResult<Arc<ProfileStore>> {
        let records = self.history.history().await?;
        let store = Arc::new(ProfileStore::build(&records));
        {
            let mut current = self.current.write().map_err(|err| {
                WorkshopRepositoryError::persistence(std::io::Error::other(err.to_string()))
            })?;
            *current = Arc::clone(&store);
        }
        info!(
            records = store.record_count(),
            tasks = store.task_count(),
            "rebuilt historical profiles"
        );
        Ok(store)
    }

    /// Returns the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn snapshot(&self) -> WorkshopRepositoryResult<Arc<ProfileStore>> {
        let current = self.current.read().map_err(|err| {
            WorkshopRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(Arc::clone(&current))
    }
}
