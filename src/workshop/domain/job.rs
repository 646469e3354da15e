//! Job aggregate root and the task lifecycle state machine.

use super::{
    EngineerId, HistoricalTaskRecord, JobId, NewHistoricalRecord, OutcomeScore,
    ParseTaskStatusError, ServicePackage, TaskCode, TaskDefinition, Urgency, WorkshopDomainError,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Lifecycle status of a task on an active job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created, waiting for an engineer.
    Pending,
    /// An engineer has been assigned; work has not started.
    Assigned,
    /// Work is under way.
    InProgress,
    /// Work is finished and the record has moved to history.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Returns whether the lifecycle permits moving to `target`.
    ///
    /// Assigned and in-progress tasks may be released back to pending.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Assigned)
                | (Self::Assigned, Self::InProgress | Self::Pending)
                | (Self::InProgress, Self::Completed | Self::Pending)
        )
    }

    /// Returns whether the engineer on a task in this status is occupied.
    #[must_use]
    pub const fn holds_engineer(self) -> bool {
        matches!(self, Self::Assigned | Self::InProgress)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace(' ', "_");
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "assigned" => Ok(Self::Assigned),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Vehicle brought in for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vehicle {
    /// Manufacturer.
    pub make: String,
    /// Model name.
    pub model: String,
    /// Vehicle identification number, if recorded.
    pub vin: Option<String>,
    /// Odometer reading, if recorded.
    pub mileage: Option<u32>,
}

impl Vehicle {
    /// Creates a vehicle with make and model only.
    #[must_use]
    pub fn new(make: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
            vin: None,
            mileage: None,
        }
    }

    /// Sets the VIN.
    #[must_use]
    pub fn with_vin(mut self, vin: impl Into<String>) -> Self {
        self.vin = Some(vin.into());
        self
    }

    /// Sets the mileage.
    #[must_use]
    pub const fn with_mileage(mut self, mileage: u32) -> Self {
        self.mileage = Some(mileage);
        self
    }
}

/// One task on an active job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobTask {
    task: TaskCode,
    description: String,
    estimated_minutes: u32,
    status: TaskStatus,
    engineer: Option<EngineerId>,
    suitability_score: Option<f64>,
    started_at: Option<DateTime<Utc>>,
}

impl JobTask {
    fn pending(definition: &TaskDefinition) -> Self {
        Self {
            task: definition.code().clone(),
            description: definition.name().to_owned(),
            estimated_minutes: definition.standard_minutes(),
            status: TaskStatus::Pending,
            engineer: None,
            suitability_score: None,
            started_at: None,
        }
    }

    /// Returns the task code.
    #[must_use]
    pub const fn task(&self) -> &TaskCode {
        &self.task
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the standard estimated minutes.
    #[must_use]
    pub const fn estimated_minutes(&self) -> u32 {
        self.estimated_minutes
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the assigned engineer, if any.
    #[must_use]
    pub const fn engineer(&self) -> Option<&EngineerId> {
        self.engineer.as_ref()
    }

    /// Returns the suitability score recorded at assignment, if any.
    #[must_use]
    pub const fn suitability_score(&self) -> Option<f64> {
        self.suitability_score
    }

    /// Returns the start timestamp, if started.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }
}

/// Parameter object for creating a [`Job`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    /// Service package the job was created from.
    pub package: ServicePackage,
    /// Job urgency.
    pub urgency: Urgency,
    /// Vehicle to work on.
    pub vehicle: Vehicle,
    /// Resolved task definitions, in work order.
    pub tasks: Vec<TaskDefinition>,
}

/// Job aggregate root: the active tasks for one vehicle visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    package: ServicePackage,
    urgency: Urgency,
    vehicle: Vehicle,
    tasks: Vec<JobTask>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Job {
    /// Creates a job with one pending task per definition.
    ///
    /// Repeated task codes are collapsed to their first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopDomainError::EmptyJob`] when no tasks are given.
    pub fn new(data: NewJob, clock: &impl Clock) -> Result<Self, WorkshopDomainError> {
        let mut seen = BTreeSet::new();
        let tasks: Vec<JobTask> = data
            .tasks
            .iter()
            .filter(|definition| seen.insert(definition.code().clone()))
            .map(JobTask::pending)
            .collect();
        if tasks.is_empty() {
            return Err(WorkshopDomainError::EmptyJob(
                data.package.display_name().to_owned(),
            ));
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: JobId::new(),
            package: data.package,
            urgency: data.urgency,
            vehicle: data.vehicle,
            tasks,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the job identifier.
    #[must_use]
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Returns the service package.
    #[must_use]
    pub const fn package(&self) -> ServicePackage {
        self.package
    }

    /// Returns the urgency.
    #[must_use]
    pub const fn urgency(&self) -> Urgency {
        self.urgency
    }

    /// Returns the vehicle.
    #[must_use]
    pub const fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    /// Returns the active tasks in work order.
    #[must_use]
    pub fn tasks(&self) -> &[JobTask] {
        &self.tasks
    }

    /// Returns whether no active tasks remain.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Looks up an active task.
    #[must_use]
    pub fn task(&self, code: &TaskCode) -> Option<&JobTask> {
        self.tasks.iter().find(|task| &task.task == code)
    }

    /// Iterates over tasks in the given status.
    pub fn tasks_with_status(&self, status: TaskStatus) -> impl Iterator<Item = &JobTask> {
        self.tasks.iter().filter(move |task| task.status == status)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Assigns an engineer to a pending task.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopDomainError::UnknownTask`] when the task is not on
    /// the job, or [`WorkshopDomainError::InvalidStatusTransition`] when it
    /// is not pending.
    pub fn assign_task(
        &mut self,
        code: &TaskCode,
        engineer: EngineerId,
        suitability_score: Option<f64>,
        now: DateTime<Utc>,
    ) -> Result<(), WorkshopDomainError> {
        let task = self.transition(code, TaskStatus::Assigned)?;
        task.engineer = Some(engineer);
        task.suitability_score = suitability_score;
        self.updated_at = now;
        Ok(())
    }

    /// Starts work on an assigned task.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopDomainError::UnknownTask`] when the task is not on
    /// the job, or [`WorkshopDomainError::InvalidStatusTransition`] when it
    /// is not assigned.
    pub fn start_task(
        &mut self,
        code: &TaskCode,
        started_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), WorkshopDomainError> {
        let task = self.transition(code, TaskStatus::InProgress)?;
        task.started_at = Some(started_at);
        self.updated_at = now;
        Ok(())
    }

    /// Completes an in-progress task, removing it from the job and
    /// returning its history record.
    ///
    /// Minutes taken are the whole minutes between start and finish, with
    /// a floor of one minute.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopDomainError::UnknownTask`],
    /// [`WorkshopDomainError::InvalidStatusTransition`],
    /// [`WorkshopDomainError::NoAssignedEngineer`] or
    /// [`WorkshopDomainError::FinishedBeforeStart`]. The job is unchanged on
    /// error.
    pub fn complete_task(
        &mut self,
        code: &TaskCode,
        outcome: OutcomeScore,
        finished_at: DateTime<Utc>,
    ) -> Result<HistoricalTaskRecord, WorkshopDomainError> {
        let position = self.position(code)?;
        let task = self
            .tasks
            .get(position)
            .ok_or_else(|| WorkshopDomainError::UnknownTask(code.clone()))?;
        self.check_transition(task, TaskStatus::Completed)?;

        let engineer = task
            .engineer
            .clone()
            .ok_or_else(|| WorkshopDomainError::NoAssignedEngineer {
                job_id: self.id,
                task: code.clone(),
            })?;
        let started_at = task.started_at.unwrap_or(finished_at);
        let elapsed = finished_at.signed_duration_since(started_at);
        if elapsed < chrono::Duration::zero() {
            return Err(WorkshopDomainError::FinishedBeforeStart { task: code.clone() });
        }
        let minutes_taken = u32::try_from(elapsed.num_minutes())
            .unwrap_or(u32::MAX)
            .max(1);

        let record = HistoricalTaskRecord::new(NewHistoricalRecord {
            job_id: self.id,
            task: task.task.clone(),
            engineer,
            description: task.description.clone(),
            vehicle: self.vehicle.clone(),
            urgency: self.urgency,
            estimated_minutes: task.estimated_minutes,
            minutes_taken,
            outcome,
            completed_at: finished_at,
        })?;

        self.tasks.remove(position);
        self.updated_at = finished_at;
        Ok(record)
    }

    /// Returns an assigned or in-progress task to pending and yields the
    /// engineer who held it.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopDomainError::UnknownTask`],
    /// [`WorkshopDomainError::InvalidStatusTransition`] or
    /// [`WorkshopDomainError::NoAssignedEngineer`].
    pub fn release_task(
        &mut self,
        code: &TaskCode,
        now: DateTime<Utc>,
    ) -> Result<EngineerId, WorkshopDomainError> {
        let job_id = self.id;
        let task = self.transition(code, TaskStatus::Pending)?;
        let engineer = task
            .engineer
            .take()
            .ok_or_else(|| WorkshopDomainError::NoAssignedEngineer {
                job_id,
                task: code.clone(),
            })?;
        task.suitability_score = None;
        task.started_at = None;
        self.updated_at = now;
        Ok(engineer)
    }

    fn position(&self, code: &TaskCode) -> Result<usize, WorkshopDomainError> {
        self.tasks
            .iter()
            .position(|task| &task.task == code)
            .ok_or_else(|| WorkshopDomainError::UnknownTask(code.clone()))
    }

    fn check_transition(
        &self,
        task: &JobTask,
        target: TaskStatus,
    ) -> Result<(), WorkshopDomainError> {
        if task.status.can_transition_to(target) {
            Ok(())
        } else {
            Err(WorkshopDomainError::InvalidStatusTransition {
                job_id: self.id,
                task: task.task.clone(),
                from: task.status,
                to: target,
            })
        }
    }

    /// Validates and applies a status change, returning the task for
    /// further field updates.
    fn transition(
        &mut self,
        code: &TaskCode,
        target: TaskStatus,
    ) -> Result<&mut JobTask, WorkshopDomainError> {
        let position = self.position(code)?;
        let current = self
            .tasks
            .get(position)
            .ok_or_else(|| WorkshopDomainError::UnknownTask(code.clone()))?;
        self.check_transition(current, target)?;
        let task = self
            .tasks
            .get_mut(position)
            .ok_or_else(|| WorkshopDomainError::UnknownTask(code.clone()))?;
        task.status = target;
        Ok(task)
    }
}
