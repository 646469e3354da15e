//! Engineer profiles, availability and experience tiers.

use super::{
    EngineerId, ParseAvailabilityError, TaskCategory, WorkshopDomainError,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Availability flag for taking on new work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Availability {
    /// The engineer can be assigned a task.
    Yes,
    /// The engineer currently holds an assigned or in-progress task.
    No,
}

impl Availability {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Availability {
    type Error = ParseAvailabilityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            _ => Err(ParseAvailabilityError(value.to_owned())),
        }
    }
}

/// Experience tier derived from years of experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceTier {
    /// Up to 7 years.
    Junior,
    /// 8 to 15 years.
    Senior,
    /// More than 15 years.
    Master,
}

impl ExperienceTier {
    /// Highest year count still classed as junior.
    pub const JUNIOR_MAX_YEARS: u32 = 7;
    /// Highest year count still classed as senior.
    pub const SENIOR_MAX_YEARS: u32 = 15;

    /// Classifies years of experience. This is the only place tier
    /// thresholds are applied.
    #[must_use]
    pub const fn from_years(years: u32) -> Self {
        if years <= Self::JUNIOR_MAX_YEARS {
            Self::Junior
        } else if years <= Self::SENIOR_MAX_YEARS {
            Self::Senior
        } else {
            Self::Master
        }
    }

    /// Returns the canonical display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Junior => "Junior",
            Self::Senior => "Senior",
            Self::Master => "Master",
        }
    }
}

impl fmt::Display for ExperienceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter object for creating an [`EngineerProfile`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewEngineer {
    /// Engineer identifier.
    pub id: EngineerId,
    /// Display name.
    pub name: String,
    /// Initial availability.
    pub availability: Availability,
    /// Years of experience.
    pub years_of_experience: u32,
    /// Average job completion time in minutes.
    pub avg_completion_minutes: f64,
    /// Specialization tag (a vehicle make, task name or "All Makes").
    pub specialization: String,
    /// Customer rating, 1.0 to 5.0.
    pub customer_rating: f64,
    /// Overall performance score, 0 to 100.
    pub overall_performance: f64,
    /// Per-category skill scores, 0 to 100.
    pub skill_scores: BTreeMap<TaskCategory, f64>,
}

/// Static, slowly changing engineer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineerProfile {
    id: EngineerId,
    name: String,
    availability: Availability,
    years_of_experience: u32,
    avg_completion_minutes: f64,
    specialization: String,
    customer_rating: f64,
    overall_performance: f64,
    skill_scores: BTreeMap<TaskCategory, f64>,
}

/// Performance fields recomputed in batch from job history.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceUpdate {
    /// Average job completion time in minutes.
    pub avg_completion_minutes: f64,
    /// Customer rating, 1.0 to 5.0.
    pub customer_rating: f64,
    /// Overall performance score, 0 to 100.
    pub overall_performance: f64,
    /// Per-category skill scores, 0 to 100.
    pub skill_scores: BTreeMap<TaskCategory, f64>,
}

impl EngineerProfile {
    /// Creates a validated engineer profile.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopDomainError`] when the name is blank, the rating is
    /// outside 1–5, the completion time is not positive, or any percentage
    /// score falls outside 0–100.
    pub fn new(data: NewEngineer) -> Result<Self, WorkshopDomainError> {
        let name = data.name.trim();
        if name.is_empty() {
            return Err(WorkshopDomainError::EmptyEngineerName);
        }
        validate_performance(
            data.avg_completion_minutes,
            data.customer_rating,
            data.overall_performance,
            &data.skill_scores,
        )?;
        Ok(Self {
            id: data.id,
            name: name.to_owned(),
            availability: data.availability,
            years_of_experience: data.years_of_experience,
            avg_completion_minutes: data.avg_completion_minutes,
            specialization: data.specialization.trim().to_owned(),
            customer_rating: data.customer_rating,
            overall_performance: data.overall_performance,
            skill_scores: data.skill_scores,
        })
    }

    /// Returns the engineer identifier.
    #[must_use]
    pub const fn id(&self) -> &EngineerId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the availability flag.
    #[must_use]
    pub const fn availability(&self) -> Availability {
        self.availability
    }

    /// Returns whether the engineer can take new work.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.availability == Availability::Yes
    }

    /// Returns years of experience.
    #[must_use]
    pub const fn years_of_experience(&self) -> u32 {
        self.years_of_experience
    }

    /// Returns the experience tier.
    #[must_use]
    pub const fn tier(&self) -> ExperienceTier {
        ExperienceTier::from_years(self.years_of_experience)
    }

    /// Returns the average job completion time in minutes.
    #[must_use]
    pub const fn avg_completion_minutes(&self) -> f64 {
        self.avg_completion_minutes
    }

    /// Returns the specialization tag.
    #[must_use]
    pub fn specialization(&self) -> &str {
        &self.specialization
    }

    /// Returns the customer rating.
    #[must_use]
    pub const fn customer_rating(&self) -> f64 {
        self.customer_rating
    }

    /// Returns the overall performance score.
    #[must_use]
    pub const fn overall_performance(&self) -> f64 {
        self.overall_performance
    }

    /// Returns the skill score for a category, if recorded.
    #[must_use]
    pub fn skill_score(&self, category: TaskCategory) -> Option<f64> {
        self.skill_scores.get(&category).copied()
    }

    /// Returns the highest recorded skill score.
    #[must_use]
    pub fn max_skill_score(&self) -> Option<f64> {
        self.skill_scores.values().copied().reduce(f64::max)
    }

    /// Returns all skill scores.
    #[must_use]
    pub const fn skill_scores(&self) -> &BTreeMap<TaskCategory, f64> {
        &self.skill_scores
    }

    /// Flips availability to `No` for a new assignment.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopDomainError::EngineerUnavailable`] when the engineer
    /// is already unavailable.
    pub fn reserve(&mut self) -> Result<(), WorkshopDomainError> {
        if !self.is_available() {
            return Err(WorkshopDomainError::EngineerUnavailable(self.id.clone()));
        }
        self.availability = Availability::No;
        Ok(())
    }

    /// Restores availability to `Yes`.
    pub const fn release(&mut self) {
        self.availability = Availability::Yes;
    }

    /// Replaces the batch-computed performance fields.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopDomainError`] when any value is out of range; the
    /// profile is left unchanged.
    pub fn apply_performance(
        &mut self,
        update: PerformanceUpdate,
    ) -> Result<(), WorkshopDomainError> {
        validate_performance(
            update.avg_completion_minutes,
            update.customer_rating,
            update.overall_performance,
            &update.skill_scores,
        )?;
        self.avg_completion_minutes = update.avg_completion_minutes;
        self.customer_rating = update.customer_rating;
        self.overall_performance = update.overall_performance;
        self.skill_scores = update.skill_scores;
        Ok(())
    }
}

fn validate_performance(
    avg_completion_minutes: f64,
    customer_rating: f64,
    overall_performance: f64,
    skill_scores: &BTreeMap<TaskCategory, f64>,
) -> Result<(), WorkshopDomainError> {
    if !avg_completion_minutes.is_finite() || avg_completion_minutes <= 0.0 {
        return Err(WorkshopDomainError::NonPositiveMinutes {
            field: "avg_completion_minutes",
        });
    }
    if !(1.0..=5.0).contains(&customer_rating) {
        return Err(WorkshopDomainError::InvalidCustomerRating(customer_rating));
    }
    check_percentage("overall_performance", overall_performance)?;
    skill_scores
        .values()
        .try_for_each(|&score| check_percentage("skill_score", score))
}

fn check_percentage(field: &'static str, value: f64) -> Result<(), WorkshopDomainError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(WorkshopDomainError::InvalidPercentage { field, value })
    }
}
