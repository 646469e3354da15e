//! Repository ports for engineers, active jobs, completed-task history and
//! the multi-store commits that keep them consistent.

use crate::workshop::domain::{
    EngineerId, EngineerProfile, HistoricalTaskRecord, Job, JobId, OutcomeScore,
    PerformanceUpdate, TaskCode, WorkshopDomainError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for workshop repository operations.
pub type WorkshopRepositoryResult<T> = Result<T, WorkshopRepositoryError>;

/// Engineer profile persistence contract.
#[async_trait]
pub trait EngineerRepository: Send + Sync {
    /// Stores a new engineer profile.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopRepositoryError::DuplicateEngineer`] when the
    /// identifier is already registered.
    async fn store_engineer(&self, engineer: &EngineerProfile) -> WorkshopRepositoryResult<()>;

    /// Replaces an existing engineer profile, availability included.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopRepositoryError::EngineerNotFound`] when the
    /// engineer does not exist.
    async fn update_engineer(&self, engineer: &EngineerProfile) -> WorkshopRepositoryResult<()>;

    /// Overwrites only the batch-computed performance fields of an
    /// engineer, leaving availability as stored.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopRepositoryError::EngineerNotFound`] when the
    /// engineer does not exist, or
    /// [`WorkshopRepositoryError::InvalidEngineerUpdate`] when a value is
    /// out of range.
    async fn apply_performance(
        &self,
        id: &EngineerId,
        update: PerformanceUpdate,
    ) -> WorkshopRepositoryResult<EngineerProfile>;

    /// Finds an engineer by identifier.
    async fn find_engineer(
        &self,
        id: &EngineerId,
    ) -> WorkshopRepositoryResult<Option<EngineerProfile>>;

    /// Returns every engineer ordered by identifier.
    async fn list_engineers(&self) -> WorkshopRepositoryResult<Vec<EngineerProfile>>;

    /// Returns the identifiers of engineers whose availability is `Yes`.
    async fn available_engineer_ids(&self) -> WorkshopRepositoryResult<Vec<EngineerId>>;
}

/// Active job persistence contract.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Stores a new job.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopRepositoryError::DuplicateJob`] when the job ID
    /// already exists.
    async fn store_job(&self, job: &Job) -> WorkshopRepositoryResult<()>;

    /// Finds an active job by identifier.
    ///
    /// Returns `None` once every task on the job has been completed.
    async fn find_job(&self, id: JobId) -> WorkshopRepositoryResult<Option<Job>>;

    /// Returns every active job ordered by creation time.
    async fn list_active_jobs(&self) -> WorkshopRepositoryResult<Vec<Job>>;
}

/// Append-only store of completed task records.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Appends a completed task record.
    async fn append_record(&self, record: &HistoricalTaskRecord) -> WorkshopRepositoryResult<()>;

    /// Returns every record in completion order.
    async fn history(&self) -> WorkshopRepositoryResult<Vec<HistoricalTaskRecord>>;

    /// Returns the records for one task code.
    async fn history_for_task(
        &self,
        task: &TaskCode,
    ) -> WorkshopRepositoryResult<Vec<HistoricalTaskRecord>>;
}

/// Assignment of an engineer to a pending task.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentCommit {
    /// Job holding the task.
    pub job_id: JobId,
    /// Task to assign.
    pub task: TaskCode,
    /// Engineer taking the task.
    pub engineer: EngineerId,
    /// Suitability score that justified the choice, if scored.
    pub suitability_score: Option<f64>,
    /// Commit timestamp.
    pub at: DateTime<Utc>,
}

/// Start of work on an assigned task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartCommit {
    /// Job holding the task.
    pub job_id: JobId,
    /// Task to start.
    pub task: TaskCode,
    /// When work began.
    pub started_at: DateTime<Utc>,
    /// Commit timestamp.
    pub at: DateTime<Utc>,
}

/// Completion of an in-progress task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCommit {
    /// Job holding the task.
    pub job_id: JobId,
    /// Task to complete.
    pub task: TaskCode,
    /// Outcome awarded for the work.
    pub outcome: OutcomeScore,
    /// Finish timestamp.
    pub finished_at: DateTime<Utc>,
}

/// Return of an assigned or in-progress task to the pending pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseCommit {
    /// Job holding the task.
    pub job_id: JobId,
    /// Task to release.
    pub task: TaskCode,
    /// Commit timestamp.
    pub at: DateTime<Utc>,
}

/// Multi-store mutations applied as a single atomic unit.
///
/// Each operation either applies every write or none of them.
#[async_trait]
pub trait WorkshopTransactions: Send + Sync {
    /// Marks a pending task as assigned and the engineer as unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopRepositoryError::EngineerUnavailable`] when the
    /// engineer's flag is already `No`, or
    /// [`WorkshopRepositoryError::InvalidTaskState`] when the task is no
    /// longer pending.
    async fn commit_assignment(&self, commit: &AssignmentCommit) -> WorkshopRepositoryResult<Job>;

    /// Moves an assigned task to in progress, leaving every other task on
    /// the job as stored.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopRepositoryError::JobNotFound`] for an inactive job,
    /// or [`WorkshopRepositoryError::InvalidTaskState`] when the task is not
    /// assigned.
    async fn commit_start(&self, commit: &StartCommit) -> WorkshopRepositoryResult<Job>;

    /// Moves an in-progress task into history, removes it from the active
    /// job and restores the engineer's availability.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopRepositoryError::InvalidTaskState`] when the task is
    /// not in progress.
    async fn commit_completion(
        &self,
        commit: &CompletionCommit,
    ) -> WorkshopRepositoryResult<HistoricalTaskRecord>;

    /// Returns a task to pending and restores the engineer's availability,
    /// yielding the engineer that held it.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopRepositoryError::InvalidTaskState`] when the task
    /// holds no engineer.
    async fn commit_release(&self, commit: &ReleaseCommit) -> WorkshopRepositoryResult<EngineerId>;
}

/// Errors returned by workshop repository implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkshopRepositoryError {
    /// An engineer with the same identifier already exists.
    #[error("duplicate engineer identifier: {0}")]
    DuplicateEngineer(EngineerId),

    /// A job with the same identifier already exists.
    #[error("duplicate job identifier: {0}")]
    DuplicateJob(JobId),

    /// The engineer was not found.
    #[error("engineer not found: {0}")]
    EngineerNotFound(EngineerId),

    /// The job was not found among active jobs.
    #[error("job not found: {0}")]
    JobNotFound(JobId),

    /// The engineer was claimed by another assignment first.
    #[error("engineer {0} is no longer available")]
    EngineerUnavailable(EngineerId),

    /// The task's current state rejects the requested change.
    #[error("task state rejected the change: {0}")]
    InvalidTaskState(#[source] WorkshopDomainError),

    /// The engineer's current profile rejects the update.
    #[error("engineer update rejected: {0}")]
    InvalidEngineerUpdate(#[source] WorkshopDomainError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkshopRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
