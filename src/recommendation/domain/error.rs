//! Recommendation failures.

use crate::workshop::{domain::TaskCode, ports::WorkshopRepositoryError};
use thiserror::Error;

/// Errors returned by the recommendation engine.
#[derive(Debug, Clone, Error)]
pub enum RecommendationError {
    /// No history exists for the task, so it has no profile.
    #[error("no historical profile for task {0}")]
    TaskNotFound(TaskCode),

    /// The task has history but no engineer with it is available.
    #[error("no available engineer with history on task {0}")]
    NoCandidates(TaskCode),

    /// A storage read failed.
    #[error(transparent)]
    DataAccess(#[from] WorkshopRepositoryError),

    /// The explanation template failed to render.
    #[error("failed to render explanation for task {task}: {reason}")]
    Explanation {
        /// Task being explained.
        task: TaskCode,
        /// Renderer failure description.
        reason: String,
    },
}

impl RecommendationError {
    /// Returns whether the caller can carry on with other tasks.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::TaskNotFound(_) | Self::NoCandidates(_))
    }

    /// Short human-readable reason suitable for per-task reports.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::TaskNotFound(task) => format!("no history for task {task}"),
            Self::NoCandidates(task) => {
                format!("no available engineers have completed task {task}")
            }
            Self::DataAccess(err) => format!("data access failed: {err}"),
            Self::Explanation { reason, .. } => format!("explanation failed: {reason}"),
        }
    }
}
