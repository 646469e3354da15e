//! Completed-task history records and their derived features.

use super::{EngineerId, JobId, ParseUrgencyError, TaskCode, Vehicle, WorkshopDomainError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Job urgency, ordered `Low < Normal < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Urgency {
    /// Level 1.
    Low,
    /// Level 2.
    Normal,
    /// Level 3.
    High,
}

impl Urgency {
    /// Returns the ordinal level (1–3).
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Normal => 2,
            Self::High => 3,
        }
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Urgency {
    type Error = ParseUrgencyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            _ => Err(ParseUrgencyError(value.to_owned())),
        }
    }
}

/// Outcome score awarded on completion, 1 (poor) to 5 (excellent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct OutcomeScore(u8);

impl OutcomeScore {
    /// Lowest valid score.
    pub const MIN: u8 = 1;
    /// Highest valid score.
    pub const MAX: u8 = 5;

    /// Creates a validated outcome score.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopDomainError::InvalidOutcomeScore`] outside 1–5.
    pub const fn new(value: u8) -> Result<Self, WorkshopDomainError> {
        if value < Self::MIN || value > Self::MAX {
            return Err(WorkshopDomainError::InvalidOutcomeScore(value));
        }
        Ok(Self(value))
    }

    /// Returns the numeric score.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for OutcomeScore {
    type Error = WorkshopDomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OutcomeScore> for u8 {
    fn from(score: OutcomeScore) -> Self {
        score.0
    }
}

/// Parameter object for creating a [`HistoricalTaskRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoricalRecord {
    /// Job the task belonged to.
    pub job_id: JobId,
    /// Catalogue task code.
    pub task: TaskCode,
    /// Engineer who performed the task.
    pub engineer: EngineerId,
    /// Task description at the time of work.
    pub description: String,
    /// Vehicle worked on.
    pub vehicle: Vehicle,
    /// Job urgency.
    pub urgency: Urgency,
    /// Standard estimated duration in minutes.
    pub estimated_minutes: u32,
    /// Actual duration in minutes.
    pub minutes_taken: u32,
    /// Outcome score.
    pub outcome: OutcomeScore,
    /// Completion timestamp.
    pub completed_at: DateTime<Utc>,
}

/// One completed task instance. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalTaskRecord {
    job_id: JobId,
    task: TaskCode,
    engineer: EngineerId,
    description: String,
    vehicle: Vehicle,
    urgency: Urgency,
    estimated_minutes: u32,
    minutes_taken: u32,
    outcome: OutcomeScore,
    completed_at: DateTime<Utc>,
}

impl HistoricalTaskRecord {
    /// Creates a validated history record.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopDomainError::NonPositiveMinutes`] when either the
    /// estimated or actual duration is zero.
    pub fn new(data: NewHistoricalRecord) -> Result<Self, WorkshopDomainError> {
        if data.estimated_minutes == 0 {
            return Err(WorkshopDomainError::NonPositiveMinutes {
                field: "estimated_minutes",
            });
        }
        if data.minutes_taken == 0 {
            return Err(WorkshopDomainError::NonPositiveMinutes {
                field: "minutes_taken",
            });
        }
        Ok(Self {
            job_id: data.job_id,
            task: data.task,
            engineer: data.engineer,
            description: data.description,
            vehicle: data.vehicle,
            urgency: data.urgency,
            estimated_minutes: data.estimated_minutes,
            minutes_taken: data.minutes_taken,
            outcome: data.outcome,
            completed_at: data.completed_at,
        })
    }

    /// Returns the job identifier.
    #[must_use]
    pub const fn job_id(&self) -> JobId {
        self.job_id
    }

    /// Returns the task code.
    #[must_use]
    pub const fn task(&self) -> &TaskCode {
        &self.task
    }

    /// Returns the engineer identifier.
    #[must_use]
    pub const fn engineer(&self) -> &EngineerId {
        &self.engineer
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the vehicle.
    #[must_use]
    pub const fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    /// Returns the urgency.
    #[must_use]
    pub const fn urgency(&self) -> Urgency {
        self.urgency
    }

    /// Returns the standard estimated minutes.
    #[must_use]
    pub const fn estimated_minutes(&self) -> u32 {
        self.estimated_minutes
    }

    /// Returns the actual minutes taken.
    #[must_use]
    pub const fn minutes_taken(&self) -> u32 {
        self.minutes_taken
    }

    /// Returns the outcome score.
    #[must_use]
    pub const fn outcome(&self) -> OutcomeScore {
        self.outcome
    }

    /// Returns the completion timestamp.
    #[must_use]
    pub const fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Actual minus estimated minutes. Negative when finished early.
    #[must_use]
    pub fn duration_deviation(&self) -> f64 {
        f64::from(self.minutes_taken) - f64::from(self.estimated_minutes)
    }

    /// Outcome score per minute taken.
    #[must_use]
    pub fn efficiency(&self) -> f64 {
        f64::from(self.outcome.value()) / f64::from(self.minutes_taken)
    }

    /// Urgency level multiplied by duration deviation.
    #[must_use]
    pub fn time_pressure(&self) -> f64 {
        f64::from(self.urgency.level()) * self.duration_deviation()
    }
}
