//! Domain model for engineer recommendation.
//!
//! Profiles summarise history per engineer and task; scores and the
//! [`Recommendation`] describe one ranking request.

mod error;
mod profile;
mod score;

pub use error::RecommendationError;
pub use profile::{EngineerTaskProfile, FeatureVector, ProfileStore, SimilarTask, TaskProfile};
pub use score::{
    AbsoluteBreakdown, CandidateFeatures, CandidateScore, PopulationBreakdown, Recommendation,
    RecommendationParts, ScoreBreakdown, ScoringMode, TaskSkillSource,
};
