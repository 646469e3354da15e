//! Commits that land while a lifecycle or performance operation is under
//! way.

use std::sync::{Arc, Mutex};

use super::helpers::{
    at_minute, engineer, engineer_id, ensure_availability_matches_tasks, standard_history,
    task_code,
};
use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::rstest;
use torque::workshop::{
    adapters::memory::InMemoryWorkshop,
    domain::{
        EngineerId, EngineerProfile, HistoricalTaskRecord, Job, JobId, OutcomeScore,
        PerformanceUpdate, ServicePackage, TaskCatalogue, TaskCode, TaskStatus, Vehicle,
    },
    ports::{
        AssignmentCommit, CompletionCommit, EngineerRepository, HistoryRepository, JobRepository,
        ReleaseCommit, StartCommit, WorkshopRepositoryResult, WorkshopTransactions,
    },
    services::{CreateJobRequest, JobLifecycleService, PerformanceAnalyzer, StartTaskRequest},
};

/// A commit made by another worker.
enum Concurrent {
    Assignment(AssignmentCommit),
    Completion(CompletionCommit),
}

/// Delegates to an in-memory workshop, landing one concurrent commit the
/// first time a service reads or writes an engineer or a job.
struct InterleavedWorkshop {
    inner: Arc<InMemoryWorkshop>,
    concurrent: Mutex<Option<Concurrent>>,
}

impl InterleavedWorkshop {
    fn new(inner: Arc<InMemoryWorkshop>) -> Self {
        Self {
            inner,
            concurrent: Mutex::new(None),
        }
    }

    fn schedule(&self, commit: Concurrent) {
        *self.concurrent.lock().expect("concurrent commit lock") = Some(commit);
    }

    fn landed(&self) -> bool {
        self.concurrent
            .lock()
            .expect("concurrent commit lock")
            .is_none()
    }

    async fn land_concurrent(&self) -> WorkshopRepositoryResult<()> {
        let concurrent = self.concurrent.lock().expect("concurrent commit lock").take();
        match concurrent {
            Some(Concurrent::Assignment(commit)) => {
                self.inner.commit_assignment(&commit).await?;
            }
            Some(Concurrent::Completion(commit)) => {
                self.inner.commit_completion(&commit).await?;
            }
            None => {}
        }
        Ok(())
    }
}

#[async_trait]
impl EngineerRepository for InterleavedWorkshop {
    async fn store_engineer(&self, engineer: &EngineerProfile) -> WorkshopRepositoryResult<()> {
        self.inner.store_engineer(engineer).await
    }

    async fn update_engineer(&self, engineer: &EngineerProfile) -> WorkshopRepositoryResult<()> {
        self.land_concurrent().await?;
        self.inner.update_engineer(engineer).await
    }

    async fn apply_performance(
        &self,
        id: &EngineerId,
        update: PerformanceUpdate,
    ) -> WorkshopRepositoryResult<EngineerProfile> {
        self.land_concurrent().await?;
        self.inner.apply_performance(id, update).await
    }

    async fn find_engineer(
        &self,
        id: &EngineerId,
    ) -> WorkshopRepositoryResult<Option<EngineerProfile>> {
        self.land_concurrent().await?;
        self.inner.find_engineer(id).await
    }

    async fn list_engineers(&self) -> WorkshopRepositoryResult<Vec<EngineerProfile>> {
        self.inner.list_engineers().await
    }

    async fn available_engineer_ids(&self) -> WorkshopRepositoryResult<Vec<EngineerId>> {
        self.inner.available_engineer_ids().await
    }
}

#[async_trait]
impl JobRepository for InterleavedWorkshop {
    async fn store_job(&self, job: &Job) -> WorkshopRepositoryResult<()> {
        self.inner.store_job(job).await
    }

    async fn find_job(&self, id: JobId) -> WorkshopRepositoryResult<Option<Job>> {
        self.land_concurrent().await?;
        self.inner.find_job(id).await
    }

    async fn list_active_jobs(&self) -> WorkshopRepositoryResult<Vec<Job>> {
        self.inner.list_active_jobs().await
    }
}

#[async_trait]
impl HistoryRepository for InterleavedWorkshop {
    async fn append_record(&self, record: &HistoricalTaskRecord) -> WorkshopRepositoryResult<()> {
        self.inner.append_record(record).await
    }

    async fn history(&self) -> WorkshopRepositoryResult<Vec<HistoricalTaskRecord>> {
        self.inner.history().await
    }

    async fn history_for_task(
        &self,
        task: &TaskCode,
    ) -> WorkshopRepositoryResult<Vec<HistoricalTaskRecord>> {
        self.inner.history_for_task(task).await
    }
}

#[async_trait]
impl WorkshopTransactions for InterleavedWorkshop {
    async fn commit_assignment(&self, commit: &AssignmentCommit) -> WorkshopRepositoryResult<Job> {
        self.land_concurrent().await?;
        self.inner.commit_assignment(commit).await
    }

    async fn commit_start(&self, commit: &StartCommit) -> WorkshopRepositoryResult<Job> {
        self.land_concurrent().await?;
        self.inner.commit_start(commit).await
    }

    async fn commit_completion(
        &self,
        commit: &CompletionCommit,
    ) -> WorkshopRepositoryResult<HistoricalTaskRecord> {
        self.land_concurrent().await?;
        self.inner.commit_completion(commit).await
    }

    async fn commit_release(&self, commit: &ReleaseCommit) -> WorkshopRepositoryResult<EngineerId> {
        self.land_concurrent().await?;
        self.inner.commit_release(commit).await
    }
}

struct Floor {
    inner: Arc<InMemoryWorkshop>,
    interleaved: Arc<InterleavedWorkshop>,
    lifecycle: JobLifecycleService<InterleavedWorkshop, DefaultClock>,
    job: Job,
}

async fn floor() -> Result<Floor, eyre::Report> {
    let inner = Arc::new(InMemoryWorkshop::new());
    for profile in [engineer("E1", 10), engineer("E2", 3)] {
        inner.store_engineer(&profile).await?;
    }
    for entry in standard_history() {
        inner.append_record(&entry).await?;
    }
    let interleaved = Arc::new(InterleavedWorkshop::new(Arc::clone(&inner)));
    let lifecycle = JobLifecycleService::new(
        Arc::clone(&interleaved),
        Arc::new(TaskCatalogue::standard()),
        Arc::new(DefaultClock),
    );
    let job = lifecycle
        .create_job(
            CreateJobRequest::new(ServicePackage::Custom, Vehicle::new("Ford", "Focus"))
                .with_custom_tasks([task_code("T001"), task_code("T002")]),
        )
        .await?;
    Ok(Floor {
        inner,
        interleaved,
        lifecycle,
        job,
    })
}

fn assignment(job_id: JobId, task: &str, engineer: &str) -> AssignmentCommit {
    AssignmentCommit {
        job_id,
        task: task_code(task),
        engineer: engineer_id(engineer),
        suitability_score: None,
        at: at_minute(0),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_keeps_an_assignment_committed_meanwhile() -> Result<(), eyre::Report> {
    let floor = floor().await?;
    let job_id = floor.job.id();
    floor
        .inner
        .commit_assignment(&assignment(job_id, "T001", "E1"))
        .await?;
    floor
        .interleaved
        .schedule(Concurrent::Assignment(assignment(job_id, "T002", "E2")));

    let started = floor
        .lifecycle
        .start_task(StartTaskRequest::new(job_id, task_code("T001")).with_started_at(at_minute(1)))
        .await?;

    assert!(floor.interleaved.landed());
    let stored = floor
        .inner
        .find_job(job_id)
        .await?
        .ok_or_else(|| eyre::eyre!("job should stay active"))?;
    assert_eq!(stored, started);
    let t002 = stored
        .task(&task_code("T002"))
        .ok_or_else(|| eyre::eyre!("T002 missing"))?;
    assert_eq!(t002.status(), TaskStatus::Assigned);
    assert_eq!(t002.engineer(), Some(&engineer_id("E2")));
    ensure_availability_matches_tasks(&floor.inner).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_keeps_a_completion_committed_meanwhile() -> Result<(), eyre::Report> {
    let floor = floor().await?;
    let job_id = floor.job.id();
    for (task, engineer) in [("T001", "E1"), ("T002", "E2")] {
        floor
            .inner
            .commit_assignment(&assignment(job_id, task, engineer))
            .await?;
    }
    floor
        .inner
        .commit_start(&StartCommit {
            job_id,
            task: task_code("T002"),
            started_at: at_minute(0),
            at: at_minute(0),
        })
        .await?;
    floor
        .interleaved
        .schedule(Concurrent::Completion(CompletionCommit {
            job_id,
            task: task_code("T002"),
            outcome: OutcomeScore::new(4)?,
            finished_at: at_minute(16),
        }));

    floor
        .lifecycle
        .start_task(StartTaskRequest::new(job_id, task_code("T001")).with_started_at(at_minute(2)))
        .await?;

    assert!(floor.interleaved.landed());
    let stored = floor
        .inner
        .find_job(job_id)
        .await?
        .ok_or_else(|| eyre::eyre!("job should stay active"))?;
    let statuses: Vec<(&str, TaskStatus)> = stored
        .tasks()
        .iter()
        .map(|task| (task.task().as_str(), task.status()))
        .collect();
    assert_eq!(statuses, [("T001", TaskStatus::InProgress)]);
    let t002_history = floor.inner.history_for_task(&task_code("T002")).await?;
    assert_eq!(t002_history.len(), 2);
    ensure_availability_matches_tasks(&floor.inner).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recompute_keeps_an_assignment_committed_meanwhile() -> Result<(), eyre::Report> {
    let floor = floor().await?;
    let job_id = floor.job.id();
    let analyzer = PerformanceAnalyzer::new(
        Arc::clone(&floor.interleaved),
        Arc::new(TaskCatalogue::standard()),
    );
    floor
        .interleaved
        .schedule(Concurrent::Assignment(assignment(job_id, "T001", "E1")));

    let updated = analyzer.recompute().await?;

    assert!(floor.interleaved.landed());
    let e1 = updated
        .iter()
        .find(|profile| profile.id() == &engineer_id("E1"))
        .ok_or_else(|| eyre::eyre!("E1 should be recomputed"))?;
    assert!(!e1.is_available());
    assert!((e1.customer_rating() - 4.67).abs() < 1e-9);
    let stored = floor
        .inner
        .find_engineer(&engineer_id("E1"))
        .await?
        .ok_or_else(|| eyre::eyre!("E1 missing"))?;
    assert_eq!(&stored, e1);
    ensure_availability_matches_tasks(&floor.inner).await
}
