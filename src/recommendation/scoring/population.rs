//! Population-relative scoring: each candidate against the others.

use crate::config::PopulationWeights;
use crate::recommendation::domain::{
    CandidateFeatures, CandidateScore, PopulationBreakdown, ScoreBreakdown,
};
use crate::stats::{round2, sigmoid, z_scores};
use crate::workshop::domain::TaskCode;

/// Scores every candidate from z-scores over the candidate set.
///
/// Only relative differences matter, so shifting or positively rescaling a
/// feature across all candidates leaves the scores unchanged.
pub(crate) fn score(
    weights: &PopulationWeights,
    task: &TaskCode,
    task_name: Option<&str>,
    candidates: &[CandidateFeatures],
) -> Vec<CandidateScore> {
    let column = |pick: fn(&CandidateFeatures) -> f64| {
        z_scores(&candidates.iter().map(pick).collect::<Vec<_>>())
    };
    let experience = column(|c| c.years_of_experience);
    let rating = column(|c| c.customer_rating);
    let outcome = column(|c| c.historical_outcome);
    let completion_time = column(|c| c.avg_completion_minutes);

    candidates
        .iter()
        .zip(experience)
        .zip(rating)
        .zip(outcome)
        .zip(completion_time)
        .map(|((((candidate, z_e), z_r), z_p), z_t)| {
            let specialization_match = specialization_matches(candidate, task, task_name);
            let delta = if specialization_match { 1.0 } else { 0.0 };
            let raw = weights.experience * z_e + weights.rating * z_r + weights.outcome * z_p
                - weights.completion_time * z_t
                + weights.specialization * delta;
            CandidateScore {
                engineer: candidate.engineer.clone(),
                score: round2(100.0 * sigmoid(raw)),
                breakdown: ScoreBreakdown::Population(PopulationBreakdown {
                    experience: z_e,
                    rating: z_r,
                    outcome: z_p,
                    completion_time: z_t,
                    specialization_match,
                    raw,
                }),
            }
        })
        .collect()
}

fn specialization_matches(
    candidate: &CandidateFeatures,
    task: &TaskCode,
    task_name: Option<&str>,
) -> bool {
    let specialization = candidate.specialization.trim();
    !specialization.is_empty()
        && (specialization.eq_ignore_ascii_case(task.as_str())
            || task_name.is_some_and(|name| specialization.eq_ignore_ascii_case(name.trim())))
}
