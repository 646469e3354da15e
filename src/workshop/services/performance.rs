//! Batch recomputation of engineer performance from completed work.

use crate::stats::{mean, round2};
use crate::workshop::{
    domain::{
        EngineerId, EngineerProfile, HistoricalTaskRecord, PerformanceUpdate, TaskCatalogue,
        TaskCategory, WorkshopDomainError,
    },
    ports::{EngineerRepository, HistoryRepository, WorkshopRepositoryError},
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

const QUALITY_WEIGHT: f64 = 0.75;
const RATING_WEIGHT: f64 = 0.05;
const TIMELINESS_WEIGHT: f64 = 0.20;
/// Timeliness awarded to an engineer exactly at the workshop average.
const BASELINE_TIMELINESS: f64 = 75.0;
/// Skill assumed for a category the engineer has no record in.
const DEFAULT_SKILL: f64 = 75.0;

/// Service-level errors for performance recomputation.
#[derive(Debug, Error)]
pub enum PerformanceError {
    /// A recomputed value failed validation.
    #[error(transparent)]
    Domain(#[from] WorkshopDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] WorkshopRepositoryError),
}

/// Skill score for a mean outcome: 1 maps to 0 and 5 maps to 100.
#[must_use]
pub fn skill_from_outcome(mean_outcome: f64) -> f64 {
    ((mean_outcome - 1.0) / 4.0 * 100.0).clamp(0.0, 100.0)
}

/// Recomputes average time, rating, skill and overall performance for
/// every engineer with completed work.
pub struct PerformanceAnalyzer<R>
where
    R: EngineerRepository + HistoryRepository,
{
    repository: Arc<R>,
    catalogue: Arc<TaskCatalogue>,
}

impl<R> PerformanceAnalyzer<R>
where
    R: EngineerRepository + HistoryRepository,
{
    /// Creates an analyzer.
    #[must_use]
    pub const fn new(repository: Arc<R>, catalogue: Arc<TaskCatalogue>) -> Self {
        Self {
            repository,
            catalogue,
        }
    }

    /// Recomputes and stores performance for every engineer with history.
    ///
    /// Only the performance fields are written, so availability changes
    /// committed meanwhile survive. Skill scores for categories without
    /// history keep their previous values. Engineers without history are
    /// left untouched. Returns the updated profiles.
    ///
    /// # Errors
    ///
    /// Returns [`PerformanceError::Domain`] when a recomputed value is out
    /// of range and [`PerformanceError::Repository`] when storage fails.
    pub async fn recompute(&self) -> Result<Vec<EngineerProfile>, PerformanceError> {
        let history = self.repository.history().await?;
        let Some(global_minutes) =
            mean(history.iter().map(|record| f64::from(record.minutes_taken())))
        else {
            return Ok(Vec::new());
        };
        let categories: BTreeSet<TaskCategory> =
            self.catalogue.iter().map(|task| task.category()).collect();

        let mut by_engineer: BTreeMap<&EngineerId, Vec<&HistoricalTaskRecord>> = BTreeMap::new();
        for record in &history {
            by_engineer.entry(record.engineer()).or_default().push(record);
        }

        let mut updated = Vec::with_capacity(by_engineer.len());
        for (engineer_id, records) in by_engineer {
            let Some(engineer) = self.repository.find_engineer(engineer_id).await? else {
                continue;
            };
            let update = self.performance_update(&engineer, &records, &categories, global_minutes);
            let stored = self
                .repository
                .apply_performance(engineer_id, update)
                .await
                .map_err(|err| match err {
                    WorkshopRepositoryError::InvalidEngineerUpdate(domain) => {
                        PerformanceError::Domain(domain)
                    }
                    other => PerformanceError::Repository(other),
                })?;
            updated.push(stored);
        }
        info!(engineers = updated.len(), records = history.len(), "recomputed engineer performance");
        Ok(updated)
    }

    fn performance_update(
        &self,
        engineer: &EngineerProfile,
        records: &[&HistoricalTaskRecord],
        categories: &BTreeSet<TaskCategory>,
        global_minutes: f64,
    ) -> PerformanceUpdate {
        let mut outcomes: BTreeMap<TaskCategory, Vec<f64>> = BTreeMap::new();
        for record in records {
            if let Some(category) = self.catalogue.category_of(record.task()) {
                outcomes
                    .entry(category)
                    .or_default()
                    .push(f64::from(record.outcome().value()));
            }
        }
        let mut skill_scores = engineer.skill_scores().clone();
        for (category, values) in outcomes {
            if let Some(mean_outcome) = mean(values) {
                skill_scores.insert(category, round2(skill_from_outcome(mean_outcome)));
            }
        }

        let outcome_mean = mean(records.iter().map(|record| f64::from(record.outcome().value())))
            .unwrap_or_else(|| engineer.customer_rating());
        let avg_minutes = mean(records.iter().map(|record| f64::from(record.minutes_taken())))
            .unwrap_or_else(|| engineer.avg_completion_minutes());

        let quality = mean(categories.iter().map(|category| {
            skill_scores.get(category).copied().unwrap_or(DEFAULT_SKILL)
        }))
        .unwrap_or(DEFAULT_SKILL);
        let rating_score = skill_from_outcome(outcome_mean);
        let timeliness = (BASELINE_TIMELINESS * global_minutes / avg_minutes).clamp(0.0, 100.0);
        let overall = (QUALITY_WEIGHT * quality
            + RATING_WEIGHT * rating_score
            + TIMELINESS_WEIGHT * timeliness)
            .clamp(0.0, 100.0);

        PerformanceUpdate {
            avg_completion_minutes: round2(avg_minutes),
            customer_rating: round2(outcome_mean),
            overall_performance: round2(overall),
            skill_scores,
        }
    }
}
