//! Ranked engineer recommendations for a task.

use super::{
    AvailabilityGate, ProfileRegistry,
    explanation::{self, ExplanationInput},
};
use crate::config::{DispatchConfig, TieBreakConfig, TieBreakPolicy};
use crate::recommendation::{
    domain::{
        CandidateFeatures, CandidateScore, ProfileStore, Recommendation, RecommendationError,
        RecommendationParts,
    },
    scoring::SuitabilityScorer,
};
use crate::workshop::{
    domain::{TaskCatalogue, TaskCode},
    ports::{EngineerRepository, HistoryRepository, WorkshopRepositoryError},
};
use rand::Rng;
use rand::prelude::IndexedRandom;
use std::sync::Arc;
use tracing::debug;

/// Result type for recommendation operations.
pub type RecommendationResult<T> = Result<T, RecommendationError>;

/// Combines profiles, live availability and scoring into recommendations.
///
/// The engine only reads; persisting an assignment is the caller's job.
pub struct RecommendationEngine<R, H>
where
    R: EngineerRepository,
    H: HistoryRepository,
{
    engineers: Arc<R>,
    availability: AvailabilityGate<R>,
    profiles: Arc<ProfileRegistry<H>>,
    catalogue: Arc<TaskCatalogue>,
    scorer: SuitabilityScorer,
    tie_break: TieBreakConfig,
    similar_task_limit: usize,
}

impl<R, H> RecommendationEngine<R, H>
where
    R: EngineerRepository,
    H: HistoryRepository,
{
    /// Creates an engine.
    #[must_use]
    pub fn new(
        engineers: Arc<R>,
        profiles: Arc<ProfileRegistry<H>>,
        catalogue: Arc<TaskCatalogue>,
        config: &DispatchConfig,
    ) -> Self {
        Self {
            availability: AvailabilityGate::new(Arc::clone(&engineers)),
            engineers,
            profiles,
            catalogue,
            scorer: SuitabilityScorer::from_config(config),
            tie_break: config.tie_break,
            similar_task_limit: config.similar_task_limit,
        }
    }

    /// Returns the profile registry backing this engine.
    #[must_use]
    pub const fn profiles(&self) -> &Arc<ProfileRegistry<H>> {
        &self.profiles
    }

    /// Recommends up to `top_n` engineers for `task` and selects one.
    ///
    /// A `top_n` of zero is treated as one. Near-tied candidates are
    /// resolved by the configured tie-break policy using the thread-local
    /// random source.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendationError::TaskNotFound`] when the task has no
    /// history, [`RecommendationError::NoCandidates`] when no engineer with
    /// history on it is available, and [`RecommendationError::DataAccess`]
    /// when storage fails.
    pub async fn recommend(
        &self,
        task: &TaskCode,
        top_n: usize,
    ) -> RecommendationResult<Recommendation> {
        let (store, ranked) = self.rank(task, top_n).await?;
        self.finish(task, &store, ranked, &mut rand::rng())
    }

    /// Same as [`RecommendationEngine::recommend`] with a caller-supplied
    /// random source for tie-breaking.
    ///
    /// # Errors
    ///
    /// As [`RecommendationEngine::recommend`].
    pub async fn recommend_with_rng<G>(
        &self,
        task: &TaskCode,
        top_n: usize,
        rng: &mut G,
    ) -> RecommendationResult<Recommendation>
    where
        G: Rng + Send,
    {
        let (store, ranked) = self.rank(task, top_n).await?;
        self.finish(task, &store, ranked, rng)
    }

    /// Scores every eligible candidate and returns the best `top_n` with
    /// the profile snapshot they were scored against.
    async fn rank(
        &self,
        task: &TaskCode,
        top_n: usize,
    ) -> RecommendationResult<(Arc<ProfileStore>, Vec<CandidateScore>)> {
        let store = self.profiles.snapshot()?;
        let engineer_profiles = store
            .engineers_for(task)
            .ok_or_else(|| RecommendationError::TaskNotFound(task.clone()))?;
        let available = self.availability.available_engineers().await?;

        let mut candidates = Vec::new();
        let category = self.catalogue.category_of(task);
        for (engineer_id, history) in engineer_profiles {
            if !available.contains(engineer_id) {
                continue;
            }
            let engineer = self
                .engineers
                .find_engineer(engineer_id)
                .await?
                .ok_or_else(|| WorkshopRepositoryError::EngineerNotFound(engineer_id.clone()))?;
            candidates.push(CandidateFeatures::from_profiles(&engineer, history, category));
        }
        if candidates.is_empty() {
            debug!(task = %task, "no available engineer has history on task");
            return Err(RecommendationError::NoCandidates(task.clone()));
        }

        let task_name = self.catalogue.get(task).map(|definition| definition.name());
        let mut ranked = self.scorer.score(task, task_name, &candidates);
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.engineer.cmp(&b.engineer))
        });
        ranked.truncate(top_n.max(1));
        Ok((store, ranked))
    }

    fn finish<G>(
        &self,
        task: &TaskCode,
        store: &ProfileStore,
        ranked: Vec<CandidateScore>,
        rng: &mut G,
    ) -> RecommendationResult<Recommendation>
    where
        G: Rng + ?Sized,
    {
        let selected = select(&ranked, self.tie_break, rng)
            .cloned()
            .ok_or_else(|| RecommendationError::NoCandidates(task.clone()))?;
        let similar_tasks = store.similar_tasks(task, self.similar_task_limit);
        let task_name = self
            .catalogue
            .get(task)
            .map(|definition| definition.name().to_owned());
        let explanation = explanation::render(&ExplanationInput {
            task,
            task_name: task_name.as_deref(),
            ranked: &ranked,
            selected: &selected,
            similar: &similar_tasks,
        })?;
        debug!(
            task = %task,
            engineer = %selected.engineer,
            score = selected.score,
            mode = %selected.breakdown.mode(),
            candidates = ranked.len(),
            "recommended engineer"
        );
        Ok(Recommendation::new(RecommendationParts {
            task: task.clone(),
            task_name,
            ranked,
            selected,
            similar_tasks,
            explanation,
        }))
    }
}

/// Picks the engineer to assign from a ranking sorted best first.
fn select<'a, G>(
    ranked: &'a [CandidateScore],
    tie_break: TieBreakConfig,
    rng: &mut G,
) -> Option<&'a CandidateScore>
where
    G: Rng + ?Sized,
{
    let top = ranked.first()?;
    match tie_break.policy {
        TieBreakPolicy::First => Some(top),
        TieBreakPolicy::Randomized => {
            let near_ties: Vec<&CandidateScore> = ranked
                .iter()
                .take_while(|candidate| top.score - candidate.score < tie_break.margin)
                .collect();
            near_ties.choose(rng).copied().or(Some(top))
        }
    }
}
