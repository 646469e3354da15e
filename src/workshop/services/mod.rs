//! Application services for the workshop floor.

mod assignment;
mod lifecycle;
mod performance;

pub use assignment::{
    AssignmentCoordinator, AssignmentError, AssignmentResult, DEFAULT_SHORTLIST,
    JobAssignmentReport, TaskAssignment, TaskAssignmentOutcome,
};
pub use lifecycle::{
    CompleteTaskRequest, CreateJobRequest, JobLifecycleError, JobLifecycleResult,
    JobLifecycleService, StartTaskRequest,
};
pub use performance::{PerformanceAnalyzer, PerformanceError, skill_from_outcome};
