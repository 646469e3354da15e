//! Error types for workshop domain validation and parsing.

use super::{EngineerId, JobId, TaskCode, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating workshop domain values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkshopDomainError {
    /// The engineer identifier is empty after trimming.
    #[error("engineer identifier must not be empty")]
    EmptyEngineerId,

    /// The engineer identifier contains whitespace.
    #[error("invalid engineer identifier '{0}'")]
    InvalidEngineerId(String),

    /// The task code is empty after trimming.
    #[error("task code must not be empty")]
    EmptyTaskCode,

    /// The task code contains whitespace.
    #[error("invalid task code '{0}'")]
    InvalidTaskCode(String),

    /// The engineer name is empty after trimming.
    #[error("engineer name must not be empty")]
    EmptyEngineerName,

    /// The outcome score is outside the 1–5 range.
    #[error("invalid outcome score {0}, expected 1 to 5")]
    InvalidOutcomeScore(u8),

    /// The customer rating is outside the 1–5 range or not finite.
    #[error("invalid customer rating {0}, expected 1.0 to 5.0")]
    InvalidCustomerRating(f64),

    /// A percentage-style score is outside 0–100 or not finite.
    #[error("invalid {field} {value}, expected 0 to 100")]
    InvalidPercentage {
        /// Name of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// A duration in minutes is zero.
    #[error("{field} must be a positive number of minutes")]
    NonPositiveMinutes {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A job was requested with no tasks.
    #[error("job '{0}' has no tasks")]
    EmptyJob(String),

    /// A task code was not present in the catalogue.
    #[error("task {0} is not in the task catalogue")]
    UnknownTask(TaskCode),

    /// A task lifecycle transition is not allowed.
    #[error("task {task} of job {job_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// Job containing the task.
        job_id: JobId,
        /// Task code.
        task: TaskCode,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// The task has no assigned engineer.
    #[error("task {task} of job {job_id} has no assigned engineer")]
    NoAssignedEngineer {
        /// Job containing the task.
        job_id: JobId,
        /// Task code.
        task: TaskCode,
    },

    /// The task finish time precedes its start time.
    #[error("task {task} finished before it started")]
    FinishedBeforeStart {
        /// Task code.
        task: TaskCode,
    },

    /// The engineer is already unavailable.
    #[error("engineer {0} is not available")]
    EngineerUnavailable(EngineerId),
}

/// Error returned while parsing a task status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing an urgency level.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown urgency: {0}")]
pub struct ParseUrgencyError(pub String);

/// Error returned while parsing an availability flag.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown availability flag: {0}")]
pub struct ParseAvailabilityError(pub String);
