//! In-memory workshop store for tests and embedded use.
//!
//! One lock guards engineers, active jobs and history together so every
//! [`WorkshopTransactions`] commit is all-or-nothing.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::workshop::{
    domain::{
        EngineerId, EngineerProfile, HistoricalTaskRecord, Job, JobId, PerformanceUpdate,
        TaskCode,
    },
    ports::{
        AssignmentCommit, CompletionCommit, EngineerRepository, HistoryRepository, JobRepository,
        ReleaseCommit, StartCommit, WorkshopRepositoryError, WorkshopRepositoryResult,
        WorkshopTransactions,
    },
};

/// Thread-safe in-memory implementation of every workshop port.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkshop {
    state: Arc<RwLock<InMemoryWorkshopState>>,
}

#[derive(Debug, Default)]
struct InMemoryWorkshopState {
    engineers: BTreeMap<EngineerId, EngineerProfile>,
    jobs: BTreeMap<JobId, Job>,
    history: Vec<HistoricalTaskRecord>,
}

impl InMemoryWorkshop {
    /// Creates an empty in-memory workshop.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> WorkshopRepositoryResult<RwLockReadGuard<'_, InMemoryWorkshopState>> {
        self.state.read().map_err(|err| {
            WorkshopRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> WorkshopRepositoryResult<RwLockWriteGuard<'_, InMemoryWorkshopState>> {
        self.state.write().map_err(|err| {
            WorkshopRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl InMemoryWorkshopState {
    fn job(&self, id: JobId) -> WorkshopRepositoryResult<&Job> {
        self.jobs
            .get(&id)
            .ok_or(WorkshopRepositoryError::JobNotFound(id))
    }

    fn engineer(&self, id: &EngineerId) -> WorkshopRepositoryResult<&EngineerProfile> {
        self.engineers
            .get(id)
            .ok_or_else(|| WorkshopRepositoryError::EngineerNotFound(id.clone()))
    }
}

#[async_trait]
impl EngineerRepository for InMemoryWorkshop {
    async fn store_engineer(&self, engineer: &EngineerProfile) -> WorkshopRepositoryResult<()> {
        let mut state = self.write()?;
        if state.engineers.contains_key(engineer.id()) {
            return Err(WorkshopRepositoryError::DuplicateEngineer(
                engineer.id().clone(),
            ));
        }
        state
            .engineers
            .insert(engineer.id().clone(), engineer.clone());
        Ok(())
    }

    async fn update_engineer(&self, engineer: &EngineerProfile) -> WorkshopRepositoryResult<()> {
        let mut state = self.write()?;
        let slot = state
            .engineers
            .get_mut(engineer.id())
            .ok_or_else(|| WorkshopRepositoryError::EngineerNotFound(engineer.id().clone()))?;
        *slot = engineer.clone();
        Ok(())
    }

    async fn apply_performance(
        &self,
        id: &EngineerId,
        update: PerformanceUpdate,
    ) -> WorkshopRepositoryResult<EngineerProfile> {
        let mut state = self.write()?;
        let slot = state
            .engineers
            .get_mut(id)
            .ok_or_else(|| WorkshopRepositoryError::EngineerNotFound(id.clone()))?;
        slot.apply_performance(update)
            .map_err(WorkshopRepositoryError::InvalidEngineerUpdate)?;
        Ok(slot.clone())
    }

    async fn find_engineer(
        &self,
        id: &EngineerId,
    ) -> WorkshopRepositoryResult<Option<EngineerProfile>> {
        Ok(self.read()?.engineers.get(id).cloned())
    }

    async fn list_engineers(&self) -> WorkshopRepositoryResult<Vec<EngineerProfile>> {
        Ok(self.read()?.engineers.values().cloned().collect())
    }

    async fn available_engineer_ids(&self) -> WorkshopRepositoryResult<Vec<EngineerId>> {
        let state = self.read()?;
        Ok(state
            .engineers
            .values()
            .filter(|engineer| engineer.is_available())
            .map(|engineer| engineer.id().clone())
            .collect())
    }
}

#[async_trait]
impl JobRepository for InMemoryWorkshop {
    async fn store_job(&self, job: &Job) -> WorkshopRepositoryResult<()> {
        let mut state = self.write()?;
        if state.jobs.contains_key(&job.id()) {
            return Err(WorkshopRepositoryError::DuplicateJob(job.id()));
        }
        state.jobs.insert(job.id(), job.clone());
        Ok(())
    }

    async fn find_job(&self, id: JobId) -> WorkshopRepositoryResult<Option<Job>> {
        Ok(self.read()?.jobs.get(&id).cloned())
    }

    async fn list_active_jobs(&self) -> WorkshopRepositoryResult<Vec<Job>> {
        let mut jobs: Vec<Job> = self.read()?.jobs.values().cloned().collect();
        jobs.sort_by_key(|job| (job.created_at(), job.id()));
        Ok(jobs)
    }
}

#[async_trait]
impl HistoryRepository for InMemoryWorkshop {
    async fn append_record(&self, record: &HistoricalTaskRecord) -> WorkshopRepositoryResult<()> {
        self.write()?.history.push(record.clone());
        Ok(())
    }

    async fn history(&self) -> WorkshopRepositoryResult<Vec<HistoricalTaskRecord>> {
        Ok(self.read()?.history.clone())
    }

    async fn history_for_task(
        &self,
        task: &TaskCode,
    ) -> WorkshopRepositoryResult<Vec<HistoricalTaskRecord>> {
        let state = self.read()?;
        Ok(state
            .history
            .iter()
            .filter(|record| record.task() == task)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl WorkshopTransactions for InMemoryWorkshop {
    async fn commit_assignment(&self, commit: &AssignmentCommit) -> WorkshopRepositoryResult<Job> {
        let mut state = self.write()?;
        let mut engineer = state.engineer(&commit.engineer)?.clone();
        let mut job = state.job(commit.job_id)?.clone();

        engineer
            .reserve()
            .map_err(|_| WorkshopRepositoryError::EngineerUnavailable(commit.engineer.clone()))?;
        job.assign_task(
            &commit.task,
            commit.engineer.clone(),
            commit.suitability_score,
            commit.at,
        )
        .map_err(WorkshopRepositoryError::InvalidTaskState)?;

        state.engineers.insert(engineer.id().clone(), engineer);
        state.jobs.insert(job.id(), job.clone());
        Ok(job)
    }

    async fn commit_start(&self, commit: &StartCommit) -> WorkshopRepositoryResult<Job> {
        let mut state = self.write()?;
        let slot = state
            .jobs
            .get_mut(&commit.job_id)
            .ok_or(WorkshopRepositoryError::JobNotFound(commit.job_id))?;
        slot.start_task(&commit.task, commit.started_at, commit.at)
            .map_err(WorkshopRepositoryError::InvalidTaskState)?;
        Ok(slot.clone())
    }

    async fn commit_completion(
        &self,
        commit: &CompletionCommit,
    ) -> WorkshopRepositoryResult<HistoricalTaskRecord> {
        let mut state = self.write()?;
        let mut job = state.job(commit.job_id)?.clone();
        let record = job
            .complete_task(&commit.task, commit.outcome, commit.finished_at)
            .map_err(WorkshopRepositoryError::InvalidTaskState)?;
        let mut engineer = state.engineer(record.engineer())?.clone();
        engineer.release();

        state.engineers.insert(engineer.id().clone(), engineer);
        if job.is_finished() {
            state.jobs.remove(&job.id());
        } else {
            state.jobs.insert(job.id(), job);
        }
        state.history.push(record.clone());
        Ok(record)
    }

    async fn commit_release(&self, commit: &ReleaseCommit) -> WorkshopRepositoryResult<EngineerId> {
        let mut state = self.write()?;
        let mut job = state.job(commit.job_id)?.clone();
        let engineer_id = job
            .release_task(&commit.task, commit.at)
            .map_err(WorkshopRepositoryError::InvalidTaskState)?;
        let mut engineer = state.engineer(&engineer_id)?.clone();
        engineer.release();

        state.engineers.insert(engineer_id.clone(), engineer);
        state.jobs.insert(job.id(), job);
        Ok(engineer_id)
    }
}
