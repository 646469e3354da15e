//! Absolute scoring for a lone candidate against fixed domain bounds.

use crate::config::AbsoluteScoring;
use crate::recommendation::domain::{
    AbsoluteBreakdown, CandidateFeatures, CandidateScore, ScoreBreakdown,
};
use crate::stats::round2;

/// Weighted sum of scaled features. The default weights total 1.05, so
/// the scaled result is capped at 100.
pub(crate) fn score(config: &AbsoluteScoring, candidate: &CandidateFeatures) -> CandidateScore {
    let bounds = &config.bounds;
    let weights = &config.weights;
    let breakdown = AbsoluteBreakdown {
        experience: bounds.experience.scale(candidate.years_of_experience, false),
        rating: bounds.rating.scale(candidate.customer_rating, false),
        completion_time: bounds
            .completion_time
            .scale(candidate.avg_completion_minutes, true),
        performance: bounds
            .performance
            .scale(candidate.overall_performance, false),
        outcome: bounds.outcome.scale(candidate.historical_outcome, false),
        task_skill: candidate
            .task_skill
            .map_or(0.0, |skill| bounds.task_skill.scale(skill, false)),
        task_skill_source: candidate.task_skill_source,
    };
    let weighted = weights.experience * breakdown.experience
        + weights.rating * breakdown.rating
        + weights.completion_time * breakdown.completion_time
        + weights.performance * breakdown.performance
        + weights.outcome * breakdown.outcome
        + weights.task_skill * breakdown.task_skill;
    CandidateScore {
        engineer: candidate.engineer.clone(),
        score: round2((100.0 * weighted).clamp(0.0, 100.0)),
        breakdown: ScoreBreakdown::SingleCandidate(breakdown),
    }
}
