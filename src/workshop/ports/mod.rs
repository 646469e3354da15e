//! Port contracts for the workshop floor.
//!
//! Ports define infrastructure-agnostic interfaces used by workshop,
//! recommendation and estimation services.

pub mod repository;

pub use repository::{
    AssignmentCommit, CompletionCommit, EngineerRepository, HistoryRepository, JobRepository,
    ReleaseCommit, StartCommit, WorkshopRepositoryError, WorkshopRepositoryResult, WorkshopTransactions,
};
