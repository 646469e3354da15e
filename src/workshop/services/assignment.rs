//! Coordinates recommendation, atomic assignment and estimation.

use crate::estimation::{DynamicEstimator, JobEstimate, TaskEstimate};
use crate::recommendation::{
    domain::{Recommendation, RecommendationError},
    services::RecommendationEngine,
};
use crate::workshop::{
    domain::{EngineerId, Job, JobId, TaskCode, TaskStatus, WorkshopDomainError},
    ports::{
        AssignmentCommit, EngineerRepository, HistoryRepository, JobRepository,
        WorkshopRepositoryError, WorkshopTransactions,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Default number of ranked candidates considered for near-tie selection.
pub const DEFAULT_SHORTLIST: usize = 3;

/// Service-level errors for assignment coordination.
#[derive(Debug, Error)]
pub enum AssignmentError {
    /// No engineer could be recommended.
    #[error(transparent)]
    Recommendation(#[from] RecommendationError),
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] WorkshopDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] WorkshopRepositoryError),
    /// The job is not active.
    #[error("job not found: {0}")]
    JobNotFound(JobId),
}

impl AssignmentError {
    /// Returns whether a job-wide sweep should carry on past this error.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Recommendation(err) => err.is_recoverable(),
            Self::Domain(_)
            | Self::Repository(
                WorkshopRepositoryError::EngineerUnavailable(_)
                | WorkshopRepositoryError::InvalidTaskState(_),
            ) => true,
            Self::Repository(_) | Self::JobNotFound(_) => false,
        }
    }

    /// Short human-readable reason suitable for per-task reports.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::Recommendation(err) => err.reason(),
            Self::Domain(err) => err.to_string(),
            Self::Repository(err) => err.to_string(),
            Self::JobNotFound(job_id) => format!("job {job_id} is not active"),
        }
    }
}

/// Result type for assignment coordination.
pub type AssignmentResult<T> = Result<T, AssignmentError>;

/// A committed assignment of one task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskAssignment {
    /// Job holding the task.
    pub job_id: JobId,
    /// Assigned task.
    pub task: TaskCode,
    /// Engineer now holding the task.
    pub engineer: EngineerId,
    /// Recommendation that produced the choice.
    pub recommendation: Recommendation,
    /// Duration estimate for the engineer, when one could be made.
    pub estimate: Option<TaskEstimate>,
}

/// Per-task result of a job-wide assignment sweep.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskAssignmentOutcome {
    /// The task was assigned.
    Assigned(TaskAssignment),
    /// The task could not be assigned; the sweep carried on.
    Failed {
        /// Task code.
        task: TaskCode,
        /// Why the task was left pending.
        reason: String,
    },
    /// The task was not pending and was left alone.
    Skipped {
        /// Task code.
        task: TaskCode,
        /// Status the task was in.
        status: TaskStatus,
    },
}

impl TaskAssignmentOutcome {
    /// Returns the task code.
    #[must_use]
    pub const fn task(&self) -> &TaskCode {
        match self {
            Self::Assigned(assignment) => &assignment.task,
            Self::Failed { task, .. } | Self::Skipped { task, .. } => task,
        }
    }

    /// Returns whether the task was assigned.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned(_))
    }
}

/// Outcome of assigning every pending task on a job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobAssignmentReport {
    /// Job identifier.
    pub job_id: JobId,
    /// One outcome per task, in work order.
    pub outcomes: Vec<TaskAssignmentOutcome>,
    /// Job estimate, present when no task failed to be assigned.
    pub estimate: Option<JobEstimate>,
}

impl JobAssignmentReport {
    /// Number of tasks assigned by the sweep.
    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.is_assigned())
            .count()
    }

    /// Tasks the sweep failed to assign.
    pub fn failures(&self) -> impl Iterator<Item = (&TaskCode, &str)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            TaskAssignmentOutcome::Failed { task, reason } => Some((task, reason.as_str())),
            _ => None,
        })
    }
}

/// Glue between the recommendation engine, storage commits and the
/// estimator.
pub struct AssignmentCoordinator<R, C>
where
    R: EngineerRepository + HistoryRepository + JobRepository + WorkshopTransactions,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    engine: Arc<RecommendationEngine<R, R>>,
    estimator: DynamicEstimator<R>,
    clock: Arc<C>,
    shortlist: usize,
}

impl<R, C> AssignmentCoordinator<R, C>
where
    R: EngineerRepository + HistoryRepository + JobRepository + WorkshopTransactions,
    C: Clock + Send + Sync,
{
    /// Creates a coordinator.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        engine: Arc<RecommendationEngine<R, R>>,
        estimator: DynamicEstimator<R>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            engine,
            estimator,
            clock,
            shortlist: DEFAULT_SHORTLIST,
        }
    }

    /// Sets how many ranked candidates take part in near-tie selection.
    #[must_use]
    pub const fn with_shortlist(mut self, shortlist: usize) -> Self {
        self.shortlist = shortlist;
        self
    }

    /// Recommends an engineer for one pending task and commits the
    /// assignment.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::JobNotFound`] for an inactive job,
    /// [`AssignmentError::Domain`] when the task is missing or not pending,
    /// [`AssignmentError::Recommendation`] when nobody can be recommended,
    /// and [`AssignmentError::Repository`] when the commit is rejected.
    pub async fn assign_task(
        &self,
        job_id: JobId,
        task: &TaskCode,
    ) -> AssignmentResult<TaskAssignment> {
        let job = self.require_job(job_id).await?;
        let current = job
            .task(task)
            .ok_or_else(|| WorkshopDomainError::UnknownTask(task.clone()))?;
        if current.status() != TaskStatus::Pending {
            return Err(WorkshopDomainError::InvalidStatusTransition {
                job_id,
                task: task.clone(),
                from: current.status(),
                to: TaskStatus::Assigned,
            }
            .into());
        }
        self.assign_pending(&job, task).await
    }

    /// Assigns every pending task on a job in work order.
    ///
    /// Recoverable failures are reported per task and the sweep carries on.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::JobNotFound`] for an inactive job, or the
    /// first non-recoverable error (such as a storage failure).
    pub async fn assign_job(&self, job_id: JobId) -> AssignmentResult<JobAssignmentReport> {
        let job = self.require_job(job_id).await?;
        let mut outcomes = Vec::with_capacity(job.tasks().len());
        for job_task in job.tasks() {
            let task = job_task.task();
            if job_task.status() != TaskStatus::Pending {
                outcomes.push(TaskAssignmentOutcome::Skipped {
                    task: task.clone(),
                    status: job_task.status(),
                });
                continue;
            }
            match self.assign_pending(&job, task).await {
                Ok(assignment) => outcomes.push(TaskAssignmentOutcome::Assigned(assignment)),
                Err(err) if err.is_recoverable() => {
                    warn!(job_id = %job_id, task = %task, reason = %err.reason(), "task left pending");
                    outcomes.push(TaskAssignmentOutcome::Failed {
                        task: task.clone(),
                        reason: err.reason(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        let all_assigned = outcomes
            .iter()
            .all(|outcome| !matches!(outcome, TaskAssignmentOutcome::Failed { .. }));
        let estimate = if all_assigned {
            match self.estimator.estimate_job(job_id).await {
                Ok(estimate) => Some(estimate),
                Err(err) => {
                    warn!(job_id = %job_id, error = %err, "job estimate unavailable");
                    None
                }
            }
        } else {
            None
        };
        Ok(JobAssignmentReport {
            job_id,
            outcomes,
            estimate,
        })
    }

    async fn assign_pending(&self, job: &Job, task: &TaskCode) -> AssignmentResult<TaskAssignment> {
        let recommendation = self.engine.recommend(task, self.shortlist).await?;
        let selected = recommendation.selected();
        let commit = AssignmentCommit {
            job_id: job.id(),
            task: task.clone(),
            engineer: selected.engineer.clone(),
            suitability_score: Some(selected.score),
            at: self.clock.utc(),
        };
        if let Err(err) = self.repository.commit_assignment(&commit).await {
            warn!(
                job_id = %job.id(),
                task = %task,
                engineer = %commit.engineer,
                error = %err,
                "assignment rejected"
            );
            return Err(err.into());
        }
        info!(
            job_id = %job.id(),
            task = %task,
            engineer = %commit.engineer,
            score = selected.score,
            "assigned task"
        );

        let estimate = match self.estimator.estimate_task(task, &commit.engineer).await {
            Ok(estimate) => Some(estimate),
            Err(err) => {
                warn!(task = %task, engineer = %commit.engineer, error = %err, "task estimate unavailable");
                None
            }
        };
        Ok(TaskAssignment {
            job_id: job.id(),
            task: task.clone(),
            engineer: commit.engineer,
            recommendation,
            estimate,
        })
    }

    async fn require_job(&self, job_id: JobId) -> AssignmentResult<Job> {
        self.repository
            .find_job(job_id)
            .await?
            .ok_or(AssignmentError::JobNotFound(job_id))
    }
}
