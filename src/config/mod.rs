//! Tunable dispatch parameters.
//!
//! Every scoring weight, scaling bound, tie-break rule and blend weight is
//! carried by [`DispatchConfig`]. Defaults reproduce the workshop's
//! production tuning, so an empty TOML document is a valid configuration.
//!
//! ```toml
//! similar_task_limit = 3
//!
//! [tie_break]
//! policy = "first"
//! margin = 2.5
//!
//! [estimator]
//! junior = 0.3
//! senior = 0.5
//! master = 0.7
//! ```

use crate::workshop::domain::ExperienceTier;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Weights applied to population z-scores.
///
/// Completion time is subtracted: a faster-than-peers engineer scores
/// higher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PopulationWeights {
    /// Years of experience.
    pub experience: f64,
    /// Customer rating.
    pub rating: f64,
    /// Mean historical outcome on the task.
    pub outcome: f64,
    /// Average completion minutes (subtracted).
    pub completion_time: f64,
    /// Specialization match indicator.
    pub specialization: f64,
}

impl Default for PopulationWeights {
    fn default() -> Self {
        Self {
            experience: 0.0415,
            rating: 0.0170,
            outcome: 0.9314,
            completion_time: 0.0102,
            specialization: 0.0,
        }
    }
}

/// Weights applied to min–max scaled features of a lone candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AbsoluteWeights {
    /// Years of experience.
    pub experience: f64,
    /// Customer rating.
    pub rating: f64,
    /// Average completion minutes (inverted scale).
    pub completion_time: f64,
    /// Overall performance score.
    pub performance: f64,
    /// Mean historical outcome on the task.
    pub outcome: f64,
    /// Skill score for the task's category.
    pub task_skill: f64,
}

impl Default for AbsoluteWeights {
    fn default() -> Self {
        Self {
            experience: 0.15,
            rating: 0.20,
            completion_time: 0.10,
            performance: 0.10,
            outcome: 0.20,
            task_skill: 0.30,
        }
    }
}

impl AbsoluteWeights {
    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.experience
            + self.rating
            + self.completion_time
            + self.performance
            + self.outcome
            + self.task_skill
    }
}

/// Closed range used for min–max scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bound {
    /// Value mapped to 0.
    pub min: f64,
    /// Value mapped to 1.
    pub max: f64,
}

impl Bound {
    /// Creates a bound.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Scales `value` into `[0, 1]`, clamping values outside the range.
    ///
    /// A degenerate range scales everything to 0. With `invert` the
    /// minimum maps to 1.
    #[must_use]
    pub fn scale(&self, value: f64, invert: bool) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 || !value.is_finite() {
            return 0.0;
        }
        let scaled = ((value - self.min) / span).clamp(0.0, 1.0);
        if invert { 1.0 - scaled } else { scaled }
    }
}

/// Domain bounds for single-candidate scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AbsoluteBounds {
    /// Years of experience.
    pub experience: Bound,
    /// Customer rating.
    pub rating: Bound,
    /// Average completion minutes.
    pub completion_time: Bound,
    /// Overall performance score.
    pub performance: Bound,
    /// Mean historical outcome.
    pub outcome: Bound,
    /// Task skill score.
    pub task_skill: Bound,
}

impl Default for AbsoluteBounds {
    fn default() -> Self {
        Self {
            experience: Bound::new(0.0, 40.0),
            rating: Bound::new(1.0, 5.0),
            completion_time: Bound::new(10.0, 120.0),
            performance: Bound::new(0.0, 100.0),
            outcome: Bound::new(1.0, 5.0),
            task_skill: Bound::new(0.0, 100.0),
        }
    }
}

/// Single-candidate scoring parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AbsoluteScoring {
    /// Feature weights.
    pub weights: AbsoluteWeights,
    /// Feature bounds.
    pub bounds: AbsoluteBounds,
}

/// How the final engineer is chosen among near-tied candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreakPolicy {
    /// Pick uniformly among candidates within the margin of the top score.
    #[default]
    Randomized,
    /// Always pick the top-ranked candidate.
    First,
}

/// Near-tie selection settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TieBreakConfig {
    /// Selection policy.
    pub policy: TieBreakPolicy,
    /// Score-point distance from the top that still counts as a tie.
    pub margin: f64,
}

impl Default for TieBreakConfig {
    fn default() -> Self {
        Self {
            policy: TieBreakPolicy::Randomized,
            margin: 5.0,
        }
    }
}

/// Personal-history weight per experience tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatorWeights {
    /// Junior weight.
    pub junior: f64,
    /// Senior weight.
    pub senior: f64,
    /// Master weight.
    pub master: f64,
}

impl Default for EstimatorWeights {
    fn default() -> Self {
        Self {
            junior: 0.3,
            senior: 0.5,
            master: 0.7,
        }
    }
}

impl EstimatorWeights {
    /// Returns the personal-history weight for a tier.
    #[must_use]
    pub const fn weight_for(&self, tier: ExperienceTier) -> f64 {
        match tier {
            ExperienceTier::Junior => self.junior,
            ExperienceTier::Senior => self.senior,
            ExperienceTier::Master => self.master,
        }
    }
}

/// Complete dispatch configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Population-mode weights.
    pub population: PopulationWeights,
    /// Single-candidate weights and bounds.
    pub absolute: AbsoluteScoring,
    /// Near-tie selection.
    pub tie_break: TieBreakConfig,
    /// Number of similar tasks named in explanations.
    pub similar_task_limit: usize,
    /// Estimator blend weights.
    pub estimator: EstimatorWeights,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            population: PopulationWeights::default(),
            absolute: AbsoluteScoring::default(),
            tie_break: TieBreakConfig::default(),
            similar_task_limit: 3,
            estimator: EstimatorWeights::default(),
        }
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The document is not valid TOML for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is outside its permitted range.
    #[error("invalid configuration value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Description of the violation.
        reason: String,
    },
}

impl DispatchConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed input and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `file` inside `dir` and parses it as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the directory or file cannot be
    /// opened, otherwise as [`DispatchConfig::from_toml_str`].
    pub fn load(dir: &Utf8Path, file: &str) -> Result<Self, ConfigError> {
        let read_error = |source: std::io::Error| ConfigError::Read {
            path: dir.join(file),
            source: Arc::new(source),
        };
        let directory = Dir::open_ambient_dir(dir, ambient_authority()).map_err(read_error)?;
        let document = directory.read_to_string(file).map_err(read_error)?;
        Self::from_toml_str(&document)
    }

    /// Checks that every weight and bound is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let population = [
            ("population.experience", self.population.experience),
            ("population.rating", self.population.rating),
            ("population.outcome", self.population.outcome),
            ("population.completion_time", self.population.completion_time),
            ("population.specialization", self.population.specialization),
        ];
        let absolute = [
            ("absolute.weights.experience", self.absolute.weights.experience),
            ("absolute.weights.rating", self.absolute.weights.rating),
            (
                "absolute.weights.completion_time",
                self.absolute.weights.completion_time,
            ),
            ("absolute.weights.performance", self.absolute.weights.performance),
            ("absolute.weights.outcome", self.absolute.weights.outcome),
            ("absolute.weights.task_skill", self.absolute.weights.task_skill),
        ];
        for (field, weight) in population.into_iter().chain(absolute) {
            check_non_negative(field, weight)?;
        }
        let total = self.absolute.weights.total();
        if total <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "absolute.weights",
                reason: "at least one weight must be positive".to_owned(),
            });
        }

        let bounds = [
            ("absolute.bounds.experience", self.absolute.bounds.experience),
            ("absolute.bounds.rating", self.absolute.bounds.rating),
            (
                "absolute.bounds.completion_time",
                self.absolute.bounds.completion_time,
            ),
            ("absolute.bounds.performance", self.absolute.bounds.performance),
            ("absolute.bounds.outcome", self.absolute.bounds.outcome),
            ("absolute.bounds.task_skill", self.absolute.bounds.task_skill),
        ];
        for (field, bound) in bounds {
            if !(bound.min.is_finite() && bound.max.is_finite() && bound.min < bound.max) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("min {} must be below max {}", bound.min, bound.max),
                });
            }
        }

        check_non_negative("tie_break.margin", self.tie_break.margin)?;

        let blend = [
            ("estimator.junior", self.estimator.junior),
            ("estimator.senior", self.estimator.senior),
            ("estimator.master", self.estimator.master),
        ];
        for (field, weight) in blend {
            if !(0.0..=1.0).contains(&weight) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{weight} is outside 0 to 1"),
                });
            }
        }
        Ok(())
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be a finite, non-negative number"),
        })
    }
}
