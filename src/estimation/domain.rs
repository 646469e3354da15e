//! Estimate values and estimation failures.

use crate::workshop::{
    domain::{EngineerId, ExperienceTier, JobId, TaskCode},
    ports::WorkshopRepositoryError,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which inputs an estimate was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateSource {
    /// Personal history blended with the standard time.
    Blended,
    /// No personal history; the standard time is used unchanged.
    StandardOnly,
    /// No standard time is known; the personal average is used unchanged.
    PersonalOnly,
}

impl EstimateSource {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blended => "blended",
            Self::StandardOnly => "standard_only",
            Self::PersonalOnly => "personal_only",
        }
    }
}

impl fmt::Display for EstimateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a standard time came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardTimeSource {
    /// The task catalogue.
    Catalogue,
    /// The mean standard time recorded on past jobs, used for tasks the
    /// catalogue does not list.
    RecordedHistory,
}

impl StandardTimeSource {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Catalogue => "catalogue",
            Self::RecordedHistory => "recorded_history",
        }
    }
}

impl fmt::Display for StandardTimeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Blends a personal average with a standard time.
///
/// `personal_weight` is the share given to personal history. Returns
/// `None` when neither input is known.
#[must_use]
pub const fn blend(
    personal: Option<f64>,
    standard: Option<f64>,
    personal_weight: f64,
) -> Option<(f64, EstimateSource)> {
    match (personal, standard) {
        (Some(personal), Some(standard)) => Some((
            personal * personal_weight + standard * (1.0 - personal_weight),
            EstimateSource::Blended,
        )),
        (None, Some(standard)) => Some((standard, EstimateSource::StandardOnly)),
        (Some(personal), None) => Some((personal, EstimateSource::PersonalOnly)),
        (None, None) => None,
    }
}

/// Rounds a non-negative duration to whole minutes, halves away from zero.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is clamped to the u32 range before the cast"
)]
pub fn round_minutes(minutes: f64) -> u32 {
    if !minutes.is_finite() {
        return 0;
    }
    minutes.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Duration estimate for one engineer on one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEstimate {
    /// Task code.
    pub task: TaskCode,
    /// Engineer the estimate is for.
    pub engineer: EngineerId,
    /// Estimated minutes.
    pub minutes: u32,
    /// Standard minutes used, if known.
    pub standard_minutes: Option<f64>,
    /// Where `standard_minutes` came from.
    pub standard_source: Option<StandardTimeSource>,
    /// Engineer's mean minutes on the task, if they have history.
    pub personal_average: Option<f64>,
    /// Engineer's experience tier.
    pub tier: ExperienceTier,
    /// Share given to personal history.
    pub personal_weight: f64,
    /// Inputs the estimate came from.
    pub source: EstimateSource,
}

/// Total estimate for the assigned tasks of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobEstimate {
    /// Job identifier.
    pub job_id: JobId,
    /// Per-task estimates in work order.
    pub tasks: Vec<TaskEstimate>,
    /// Sum of task estimates in minutes.
    pub total_minutes: u32,
}

impl JobEstimate {
    /// Builds a job estimate, summing the task minutes.
    #[must_use]
    pub fn new(job_id: JobId, tasks: Vec<TaskEstimate>) -> Self {
        let total_minutes = tasks
            .iter()
            .fold(0_u32, |total, estimate| total.saturating_add(estimate.minutes));
        Self {
            job_id,
            tasks,
            total_minutes,
        }
    }
}

/// Errors returned by the duration estimator.
#[derive(Debug, Clone, Error)]
pub enum EstimationError {
    /// Neither a standard time nor personal history exists for the task.
    #[error("no standard time or personal history for task {task} and engineer {engineer}")]
    InsufficientHistory {
        /// Task code.
        task: TaskCode,
        /// Engineer identifier.
        engineer: EngineerId,
    },

    /// The engineer is not registered.
    #[error("engineer not found: {0}")]
    EngineerNotFound(EngineerId),

    /// The job is not active.
    #[error("job not found: {0}")]
    JobNotFound(JobId),

    /// The job holds no assigned task to estimate.
    #[error("no assigned tasks found on job {0}")]
    NoAssignedTasks(JobId),

    /// A storage read failed.
    #[error(transparent)]
    DataAccess(#[from] WorkshopRepositoryError),
}
