//! Experience-weighted duration estimator.

use super::domain::{
    EstimationError, JobEstimate, StandardTimeSource, TaskEstimate, blend, round_minutes,
};
use crate::config::EstimatorWeights;
use crate::stats::mean;
use crate::workshop::{
    domain::{EngineerId, JobId, TaskCatalogue, TaskCode, TaskStatus},
    ports::{EngineerRepository, HistoryRepository, JobRepository},
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Result type for estimation operations.
pub type EstimationResult<T> = Result<T, EstimationError>;

/// Estimates task durations by blending personal history with standard
/// times, trusting personal history more for more experienced engineers.
#[derive(Clone)]
pub struct DynamicEstimator<R>
where
    R: EngineerRepository + HistoryRepository + JobRepository,
{
    repository: Arc<R>,
    catalogue: Arc<TaskCatalogue>,
    weights: EstimatorWeights,
}

impl<R> DynamicEstimator<R>
where
    R: EngineerRepository + HistoryRepository + JobRepository,
{
    /// Creates an estimator.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        catalogue: Arc<TaskCatalogue>,
        weights: EstimatorWeights,
    ) -> Self {
        Self {
            repository,
            catalogue,
            weights,
        }
    }

    /// Estimates how long `engineer` will take on `task`.
    ///
    /// The standard time comes from the catalogue, or failing that from
    /// the mean standard time recorded in history; `standard_source` on the
    /// result says which.
    ///
    /// # Errors
    ///
    /// Returns [`EstimationError::EngineerNotFound`] for an unknown
    /// engineer, [`EstimationError::InsufficientHistory`] when neither a
    /// standard time nor personal history exists, and
    /// [`EstimationError::DataAccess`] when storage fails.
    pub async fn estimate_task(
        &self,
        task: &TaskCode,
        engineer: &EngineerId,
    ) -> EstimationResult<TaskEstimate> {
        let profile = self
            .repository
            .find_engineer(engineer)
            .await?
            .ok_or_else(|| EstimationError::EngineerNotFound(engineer.clone()))?;
        let records = self.repository.history_for_task(task).await?;

        let personal_average = mean(
            records
                .iter()
                .filter(|record| record.engineer() == engineer)
                .map(|record| f64::from(record.minutes_taken())),
        );
        let standard = self
            .catalogue
            .standard_minutes(task)
            .map(|minutes| (f64::from(minutes), StandardTimeSource::Catalogue))
            .or_else(|| {
                mean(records.iter().map(|record| f64::from(record.estimated_minutes())))
                    .map(|minutes| (minutes, StandardTimeSource::RecordedHistory))
            });
        let standard_minutes = standard.map(|(minutes, _)| minutes);
        let standard_source = standard.map(|(_, origin)| origin);

        let tier = profile.tier();
        let personal_weight = self.weights.weight_for(tier);
        let (minutes, source) = blend(personal_average, standard_minutes, personal_weight)
            .ok_or_else(|| {
                warn!(task = %task, engineer = %engineer, "no basis for duration estimate");
                EstimationError::InsufficientHistory {
                    task: task.clone(),
                    engineer: engineer.clone(),
                }
            })?;

        debug!(
            task = %task,
            engineer = %engineer,
            tier = %tier,
            source = %source,
            standard_source = ?standard_source,
            minutes,
            "estimated task duration"
        );
        Ok(TaskEstimate {
            task: task.clone(),
            engineer: engineer.clone(),
            minutes: round_minutes(minutes),
            standard_minutes,
            standard_source,
            personal_average,
            tier,
            personal_weight,
            source,
        })
    }

    /// Estimates several task and engineer pairs in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing pair and returns its error.
    pub async fn estimate_tasks(
        &self,
        pairs: &[(TaskCode, EngineerId)],
    ) -> EstimationResult<Vec<TaskEstimate>> {
        let mut estimates = Vec::with_capacity(pairs.len());
        for (task, engineer) in pairs {
            estimates.push(self.estimate_task(task, engineer).await?);
        }
        Ok(estimates)
    }

    /// Sums the estimates of every `Assigned` task on an active job.
    ///
    /// # Errors
    ///
    /// Returns [`EstimationError::JobNotFound`] when the job is not active
    /// and [`EstimationError::NoAssignedTasks`] when nothing on it is
    /// assigned. Any task without a basis for an estimate aborts the whole
    /// job estimate with [`EstimationError::InsufficientHistory`].
    pub async fn estimate_job(&self, job_id: JobId) -> EstimationResult<JobEstimate> {
        let job = self
            .repository
            .find_job(job_id)
            .await?
            .ok_or(EstimationError::JobNotFound(job_id))?;
        let pairs: Vec<(TaskCode, EngineerId)> = job
            .tasks_with_status(TaskStatus::Assigned)
            .filter_map(|task| {
                task.engineer()
                    .map(|engineer| (task.task().clone(), engineer.clone()))
            })
            .collect();
        if pairs.is_empty() {
            return Err(EstimationError::NoAssignedTasks(job_id));
        }
        let tasks = self.estimate_tasks(&pairs).await?;
        Ok(JobEstimate::new(job_id, tasks))
    }
}
