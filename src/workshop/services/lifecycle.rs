//! Service layer for job creation and the task lifecycle.

use crate::workshop::{
    domain::{
        EngineerId, HistoricalTaskRecord, Job, JobId, NewJob, OutcomeScore, ServicePackage,
        TaskCatalogue, TaskCode, Urgency, Vehicle, WorkshopDomainError, WorkshopStatus,
    },
    ports::{
        CompletionCommit, EngineerRepository, JobRepository, ReleaseCommit, StartCommit,
        WorkshopRepositoryError, WorkshopTransactions,
    },
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for opening a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateJobRequest {
    package: ServicePackage,
    vehicle: Vehicle,
    urgency: Urgency,
    custom_tasks: Vec<TaskCode>,
}

impl CreateJobRequest {
    /// Creates a request with normal urgency.
    #[must_use]
    pub const fn new(package: ServicePackage, vehicle: Vehicle) -> Self {
        Self {
            package,
            vehicle,
            urgency: Urgency::Normal,
            custom_tasks: Vec::new(),
        }
    }

    /// Sets job urgency.
    #[must_use]
    pub const fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    /// Sets the task list used by [`ServicePackage::Custom`].
    #[must_use]
    pub fn with_custom_tasks(mut self, tasks: impl IntoIterator<Item = TaskCode>) -> Self {
        self.custom_tasks = tasks.into_iter().collect();
        self
    }
}

/// Request payload for starting an assigned task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTaskRequest {
    job_id: JobId,
    task: TaskCode,
    started_at: Option<DateTime<Utc>>,
}

impl StartTaskRequest {
    /// Creates a request that starts the task now.
    #[must_use]
    pub const fn new(job_id: JobId, task: TaskCode) -> Self {
        Self {
            job_id,
            task,
            started_at: None,
        }
    }

    /// Records an explicit start time instead of the clock's.
    #[must_use]
    pub const fn with_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = Some(started_at);
        self
    }
}

/// Request payload for completing an in-progress task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteTaskRequest {
    job_id: JobId,
    task: TaskCode,
    outcome: u8,
    finished_at: Option<DateTime<Utc>>,
}

impl CompleteTaskRequest {
    /// Creates a request that completes the task now with the given
    /// outcome score (1–5).
    #[must_use]
    pub const fn new(job_id: JobId, task: TaskCode, outcome: u8) -> Self {
        Self {
            job_id,
            task,
            outcome,
            finished_at: None,
        }
    }

    /// Records an explicit finish time instead of the clock's.
    #[must_use]
    pub const fn with_finished_at(mut self, finished_at: DateTime<Utc>) -> Self {
        self.finished_at = Some(finished_at);
        self
    }
}

/// Service-level errors for job lifecycle operations.
#[derive(Debug, Error)]
pub enum JobLifecycleError {
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

/// Result type for job lifecycle service operations.
pub type JobLifecycleResult<T> = Result<T, JobLifecycleError>;

/// Job lifecycle orchestration service.
#[derive(Clone)]
pub struct JobLifecycleService<R, C>
where
    R: JobRepository + EngineerRepository + WorkshopTransactions,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    catalogue: Arc<TaskCatalogue>,
    clock: Arc<C>,
}

impl<R, C> JobLifecycleService<R, C>
where
    R: JobRepository + EngineerRepository + WorkshopTransactions,
    C: Clock + Send + Sync,
{
    /// Creates a new job lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, catalogue: Arc<TaskCatalogue>, clock: Arc<C>) -> Self {
        Self {
            repository,
            catalogue,
            clock,
        }
    }

    /// Opens a job with one pending task per package task.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::Domain`] when the package resolves to no
    /// tasks or names an uncatalogued task, and
    /// [`JobLifecycleError::Repository`] when persistence fails.
    pub async fn create_job(&self, request: CreateJobRequest) -> JobLifecycleResult<Job> {
        let tasks = self
            .catalogue
            .resolve_package(request.package, &request.custom_tasks)?;
        let job = Job::new(
            NewJob {
                package: request.package,
                urgency: request.urgency,
                vehicle: request.vehicle,
                tasks,
            },
            &*self.clock,
        )?;
        self.repository.store_job(&job).await?;
        info!(
            job_id = %job.id(),
            package = %job.package(),
            urgency = %job.urgency(),
            tasks = job.tasks().len(),
            "created job"
        );
        Ok(job)
    }

    /// Starts work on an assigned task. Only that task is written; other
    /// tasks on the job keep whatever state was last committed.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::JobNotFound`] for an inactive job,
    /// [`JobLifecycleError::Domain`] when the task is not assigned, and
    /// [`JobLifecycleError::Repository`] when persistence fails.
    pub async fn start_task(&self, request: StartTaskRequest) -> JobLifecycleResult<Job> {
        let now = self.clock.utc();
        let commit = StartCommit {
            job_id: request.job_id,
            task: request.task,
            started_at: request.started_at.unwrap_or(now),
            at: now,
        };
        let job = self
            .repository
            .commit_start(&commit)
            .await
            .map_err(|err| match err {
                WorkshopRepositoryError::JobNotFound(job_id) => JobLifecycleError::JobNotFound(job_id),
                WorkshopRepositoryError::InvalidTaskState(domain) => JobLifecycleError::Domain(domain),
                other => JobLifecycleError::Repository(other),
            })?;
        info!(job_id = %job.id(), task = %commit.task, "started task");
        Ok(job)
    }

    /// Completes an in-progress task and moves it into history.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::Domain`] for an out-of-range outcome,
    /// and [`JobLifecycleError::Repository`] when the task is not in
    /// progress or persistence fails.
    pub async fn complete_task(
        &self,
        request: CompleteTaskRequest,
    ) -> JobLifecycleResult<HistoricalTaskRecord> {
        let outcome = OutcomeScore::new(request.outcome)?;
        let commit = CompletionCommit {
            job_id: request.job_id,
            task: request.task,
            outcome,
            finished_at: request.finished_at.unwrap_or_else(|| self.clock.utc()),
        };
        let record = self.repository.commit_completion(&commit).await?;
        info!(
            job_id = %record.job_id(),
            task = %record.task(),
            engineer = %record.engineer(),
            minutes_taken = record.minutes_taken(),
            outcome = record.outcome().value(),
            "completed task"
        );
        Ok(record)
    }

    /// Returns an assigned or in-progress task to pending and frees its
    /// engineer.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::Repository`] when the task holds no
    /// engineer or persistence fails.
    pub async fn release_task(
        &self,
        job_id: JobId,
        task: TaskCode,
    ) -> JobLifecycleResult<EngineerId> {
        let commit = ReleaseCommit {
            job_id,
            task,
            at: self.clock.utc(),
        };
        let engineer = self.repository.commit_release(&commit).await?;
        info!(job_id = %job_id, task = %commit.task, engineer = %engineer, "released task");
        Ok(engineer)
    }

    /// Retrieves an active job.
    ///
    /// Returns `Ok(None)` once every task on the job has been completed.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::Repository`] when lookup fails.
    pub async fn find_job(&self, job_id: JobId) -> JobLifecycleResult<Option<Job>> {
        Ok(self.repository.find_job(job_id).await?)
    }

    /// Summarises task and engineer load across the workshop.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::Repository`] when lookup fails.
    pub async fn status(&self) -> JobLifecycleResult<WorkshopStatus> {
        let jobs = self.repository.list_active_jobs().await?;
        let engineers = self.repository.list_engineers().await?;
        Ok(WorkshopStatus::summarize(&jobs, &engineers))
    }
}
