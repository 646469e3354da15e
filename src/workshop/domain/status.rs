//! Point-in-time summary of workshop load.

use super::{EngineerProfile, Job, TaskStatus};
use serde::{Deserialize, Serialize};

/// Counts of active tasks by status and engineers by availability.
///
/// Completed tasks leave the active store, so `completed` always reads zero
/// here; it is kept so the summary covers the full lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkshopStatus {
    /// Active jobs with at least one task remaining.
    pub active_jobs: usize,
    /// Tasks waiting for an engineer.
    pub pending: usize,
    /// Tasks with an engineer assigned but not yet started.
    pub assigned: usize,
    /// Tasks under way.
    pub in_progress: usize,
    /// Tasks completed but still held in the active store.
    pub completed: usize,
    /// Engineers free to take work.
    pub available_engineers: usize,
    /// Engineers holding an assigned or in-progress task.
    pub busy_engineers: usize,
}

impl WorkshopStatus {
    /// Tallies the given jobs and engineers.
    #[must_use]
    pub fn summarize<'a>(
        jobs: impl IntoIterator<Item = &'a Job>,
        engineers: impl IntoIterator<Item = &'a EngineerProfile>,
    ) -> Self {
        let mut status = Self::default();
        for job in jobs {
            if !job.is_finished() {
                status.active_jobs += 1;
            }
            for task in job.tasks() {
                match task.status() {
                    TaskStatus::Pending => status.pending += 1,
                    TaskStatus::Assigned => status.assigned += 1,
                    TaskStatus::InProgress => status.in_progress += 1,
                    TaskStatus::Completed => status.completed += 1,
                }
            }
        }
        for engineer in engineers {
            if engineer.is_available() {
                status.available_engineers += 1;
            } else {
                status.busy_engineers += 1;
            }
        }
        status
    }

    /// Total active tasks across all statuses.
    #[must_use]
    pub const fn total_tasks(&self) -> usize {
        self.pending + self.assigned + self.in_progress + self.completed
    }
}
