//! Candidate features, scores and the recommendation result.

use super::{EngineerTaskProfile, SimilarTask};
use crate::workshop::domain::{EngineerId, EngineerProfile, TaskCategory, TaskCode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the single-candidate task-skill input came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSkillSource {
    /// The engineer's score for the task's own category.
    Category,
    /// No category score; the engineer's best score in any category.
    BestOverall,
    /// No skill scores at all; treated as zero.
    Missing,
}

/// Which scoring algorithm produced a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// z-scores against the other candidates.
    Population,
    /// Min–max scaling against fixed domain bounds.
    SingleCandidate,
}

impl ScoringMode {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Population => "population",
            Self::SingleCandidate => "single_candidate",
        }
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scoring inputs for one candidate engineer on one task.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFeatures {
    /// Engineer identifier.
    pub engineer: EngineerId,
    /// Years of experience.
    pub years_of_experience: f64,
    /// Customer rating, 1–5.
    pub customer_rating: f64,
    /// Average job completion minutes.
    pub avg_completion_minutes: f64,
    /// Overall performance score, 0–100.
    pub overall_performance: f64,
    /// Mean outcome on this task from history.
    pub historical_outcome: f64,
    /// Specialization tag.
    pub specialization: String,
    /// Skill score used for the task, if any.
    pub task_skill: Option<f64>,
    /// Origin of `task_skill`.
    pub task_skill_source: TaskSkillSource,
}

impl CandidateFeatures {
    /// Combines the static engineer profile with their history on the task.
    ///
    /// The task skill is the engineer's score for `category`; without one
    /// it falls back to their best score in any category.
    #[must_use]
    pub fn from_profiles(
        engineer: &EngineerProfile,
        history: &EngineerTaskProfile,
        category: Option<TaskCategory>,
    ) -> Self {
        let category_skill = category.and_then(|category| engineer.skill_score(category));
        let (task_skill, task_skill_source) = match (category_skill, engineer.max_skill_score()) {
            (Some(score), _) => (Some(score), TaskSkillSource::Category),
            (None, Some(best)) => (Some(best), TaskSkillSource::BestOverall),
            (None, None) => (None, TaskSkillSource::Missing),
        };
        Self {
            engineer: engineer.id().clone(),
            years_of_experience: f64::from(engineer.years_of_experience()),
            customer_rating: engineer.customer_rating(),
            avg_completion_minutes: engineer.avg_completion_minutes(),
            overall_performance: engineer.overall_performance(),
            historical_outcome: history.mean_outcome(),
            specialization: engineer.specialization().to_owned(),
            task_skill,
            task_skill_source,
        }
    }
}

/// Per-feature contributions in population mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationBreakdown {
    /// Experience z-score.
    pub experience: f64,
    /// Rating z-score.
    pub rating: f64,
    /// Historical outcome z-score.
    pub outcome: f64,
    /// Completion time z-score.
    pub completion_time: f64,
    /// Whether the specialization names the task.
    pub specialization_match: bool,
    /// Weighted sum before the logistic transform.
    pub raw: f64,
}

/// Per-feature scaled values in single-candidate mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbsoluteBreakdown {
    /// Scaled experience.
    pub experience: f64,
    /// Scaled rating.
    pub rating: f64,
    /// Scaled, inverted completion time.
    pub completion_time: f64,
    /// Scaled overall performance.
    pub performance: f64,
    /// Scaled historical outcome.
    pub outcome: f64,
    /// Scaled task skill.
    pub task_skill: f64,
    /// Origin of the task skill input.
    pub task_skill_source: TaskSkillSource,
}

/// How a score was assembled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ScoreBreakdown {
    /// Population-relative scoring.
    Population(PopulationBreakdown),
    /// Single-candidate absolute scoring.
    SingleCandidate(AbsoluteBreakdown),
}

impl ScoreBreakdown {
    /// Returns the scoring mode.
    #[must_use]
    pub const fn mode(&self) -> ScoringMode {
        match self {
            Self::Population(_) => ScoringMode::Population,
            Self::SingleCandidate(_) => ScoringMode::SingleCandidate,
        }
    }
}

/// Suitability of one engineer for a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    /// Engineer identifier.
    pub engineer: EngineerId,
    /// Suitability in `[0, 100]`, two decimals.
    pub score: f64,
    /// Score derivation.
    pub breakdown: ScoreBreakdown,
}

/// Parameter object for assembling a [`Recommendation`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationParts {
    /// Task recommended for.
    pub task: TaskCode,
    /// Catalogue task name, when known.
    pub task_name: Option<String>,
    /// Ranked candidates, best first.
    pub ranked: Vec<CandidateScore>,
    /// Chosen engineer.
    pub selected: CandidateScore,
    /// Tasks with similar history profiles.
    pub similar_tasks: Vec<SimilarTask>,
    /// Human-readable summary.
    pub explanation: String,
}

/// Ranked engineers for a task with the chosen engineer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    task: TaskCode,
    task_name: Option<String>,
    ranked: Vec<CandidateScore>,
    selected: CandidateScore,
    similar_tasks: Vec<SimilarTask>,
    explanation: String,
}

impl Recommendation {
    /// Assembles a recommendation.
    #[must_use]
    pub fn new(parts: RecommendationParts) -> Self {
        Self {
            task: parts.task,
            task_name: parts.task_name,
            ranked: parts.ranked,
            selected: parts.selected,
            similar_tasks: parts.similar_tasks,
            explanation: parts.explanation,
        }
    }

    /// Returns the task code.
    #[must_use]
    pub const fn task(&self) -> &TaskCode {
        &self.task
    }

    /// Returns the catalogue task name, if known.
    #[must_use]
    pub fn task_name(&self) -> Option<&str> {
        self.task_name.as_deref()
    }

    /// Returns the ranked candidates, best first.
    #[must_use]
    pub fn ranked(&self) -> &[CandidateScore] {
        &self.ranked
    }

    /// Returns the chosen candidate.
    #[must_use]
    pub const fn selected(&self) -> &CandidateScore {
        &self.selected
    }

    /// Returns the scoring mode used.
    #[must_use]
    pub const fn mode(&self) -> ScoringMode {
        self.selected.breakdown.mode()
    }

    /// Returns tasks with similar history profiles.
    #[must_use]
    pub fn similar_tasks(&self) -> &[SimilarTask] {
        &self.similar_tasks
    }

    /// Returns the explanation text.
    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}
