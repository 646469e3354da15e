//! Domain model for the workshop floor.
//!
//! Engineers, the task catalogue, active jobs and the completed-task
//! history live here. Everything is pure data and validation; storage and
//! orchestration stay behind the ports and services of this context.

mod catalogue;
mod engineer;
mod error;
mod history;
mod ids;
mod job;
mod status;

pub use catalogue::{ServicePackage, TaskCatalogue, TaskCategory, TaskDefinition};
pub use engineer::{
    Availability, EngineerProfile, ExperienceTier, NewEngineer, PerformanceUpdate,
};
pub use error::{
    ParseAvailabilityError, ParseTaskStatusError, ParseUrgencyError, WorkshopDomainError,
};
pub use history::{HistoricalTaskRecord, NewHistoricalRecord, OutcomeScore, Urgency};
pub use ids::{EngineerId, JobId, TaskCode};
pub use job::{Job, JobTask, NewJob, TaskStatus, Vehicle};
pub use status::WorkshopStatus;
