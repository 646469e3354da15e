//! Suitability scoring.
//!
//! Two algorithms share one entry point. With two or more candidates each
//! is scored relative to the others; a lone candidate is scored against
//! fixed domain bounds, since z-scores over one value are meaningless.

mod population;
mod single;

use crate::config::{AbsoluteScoring, DispatchConfig, PopulationWeights};
use crate::recommendation::domain::{CandidateFeatures, CandidateScore};
use crate::workshop::domain::TaskCode;

/// Scores candidate engineers for a task.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SuitabilityScorer {
    population: PopulationWeights,
    absolute: AbsoluteScoring,
}

impl SuitabilityScorer {
    /// Creates a scorer with explicit parameters.
    #[must_use]
    pub const fn new(population: PopulationWeights, absolute: AbsoluteScoring) -> Self {
        Self {
            population,
            absolute,
        }
    }

    /// Creates a scorer from dispatch configuration.
    #[must_use]
    pub const fn from_config(config: &DispatchConfig) -> Self {
        Self::new(config.population, config.absolute)
    }

    /// Scores candidates in input order.
    ///
    /// Every score lies in `[0, 100]` and is rounded to two decimals. An
    /// empty candidate list yields an empty result.
    #[must_use]
    pub fn score(
        &self,
        task: &TaskCode,
        task_name: Option<&str>,
        candidates: &[CandidateFeatures],
    ) -> Vec<CandidateScore> {
        match candidates {
            [] => Vec::new(),
            [only] => vec![single::score(&self.absolute, only)],
            _ => population::score(&self.population, task, task_name, candidates),
        }
    }
}
