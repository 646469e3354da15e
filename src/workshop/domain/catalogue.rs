//! Standard task catalogue and service packages.
//!
//! Every catalogue entry carries a [`TaskCategory`]. Engineer skill scores
//! are keyed by the same enum, so the mapping from a task to the skill that
//! measures it is fixed when the catalogue is built.

use super::{TaskCode, WorkshopDomainError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Skill family a catalogue task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// Oil and oil filter work.
    Lubrication,
    /// Air and cabin filters.
    Filters,
    /// Fluid level checks.
    Fluids,
    /// Tyre pressure and condition.
    Tyres,
    /// Visual and underbody inspections.
    Inspection,
    /// Brake inspection and repair.
    Brakes,
    /// Battery, lights and wipers.
    Electrical,
    /// Exhaust system.
    Exhaust,
    /// Steering, suspension, alignment and balancing.
    SteeringSuspension,
    /// Fuel system.
    FuelSystem,
    /// Transmission.
    Transmission,
    /// Spark plugs and ignition.
    Ignition,
    /// Timing belt.
    EngineTiming,
    /// Full diagnostic checks.
    Diagnostics,
}

impl TaskCategory {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lubrication => "lubrication",
            Self::Filters => "filters",
            Self::Fluids => "fluids",
            Self::Tyres => "tyres",
            Self::Inspection => "inspection",
            Self::Brakes => "brakes",
            Self::Electrical => "electrical",
            Self::Exhaust => "exhaust",
            Self::SteeringSuspension => "steering_suspension",
            Self::FuelSystem => "fuel_system",
            Self::Transmission => "transmission",
            Self::Ignition => "ignition",
            Self::EngineTiming => "engine_timing",
            Self::Diagnostics => "diagnostics",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalogue task with its standard duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    code: TaskCode,
    name: String,
    standard_minutes: u32,
    category: TaskCategory,
}

impl TaskDefinition {
    /// Creates a task definition.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopDomainError::NonPositiveMinutes`] when
    /// `standard_minutes` is zero.
    pub fn new(
        code: TaskCode,
        name: impl Into<String>,
        standard_minutes: u32,
        category: TaskCategory,
    ) -> Result<Self, WorkshopDomainError> {
        if standard_minutes == 0 {
            return Err(WorkshopDomainError::NonPositiveMinutes {
                field: "standard_minutes",
            });
        }
        Ok(Self {
            code,
            name: name.into(),
            standard_minutes,
            category,
        })
    }

    /// Returns the task code.
    #[must_use]
    pub const fn code(&self) -> &TaskCode {
        &self.code
    }

    /// Returns the human-readable task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the standard estimated duration in minutes.
    #[must_use]
    pub const fn standard_minutes(&self) -> u32 {
        self.standard_minutes
    }

    /// Returns the task's skill category.
    #[must_use]
    pub const fn category(&self) -> TaskCategory {
        self.category
    }
}

/// Predefined service packages offered at the front desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServicePackage {
    /// Oil, filters, fluids, tyre pressure and a visual inspection.
    Basic,
    /// Basic plus brakes, tyres, battery, exhaust, steering, lights.
    Intermediate,
    /// Every catalogue task.
    Full,
    /// Tasks chosen individually by the service advisor.
    Custom,
}

const BASIC_TASKS: [&str; 6] = ["T001", "T002", "T003", "T004", "T005", "T006"];
const INTERMEDIATE_EXTRA_TASKS: [&str; 6] = ["T007", "T008", "T009", "T010", "T011", "T012"];
const FULL_EXTRA_TASKS: [&str; 8] = [
    "T013", "T014", "T015", "T016", "T017", "T018", "T019", "T020",
];

impl ServicePackage {
    /// Returns the display name used on job cards.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Basic => "Basic Service",
            Self::Intermediate => "Intermediate Service",
            Self::Full => "Full Service",
            Self::Custom => "Custom Service",
        }
    }

    /// Returns the task codes bundled in the package.
    ///
    /// [`ServicePackage::Custom`] bundles nothing; its tasks are supplied by
    /// the caller.
    #[must_use]
    pub fn task_codes(self) -> Vec<TaskCode> {
        let groups: &[&[&'static str]] = match self {
            Self::Basic => &[&BASIC_TASKS],
            Self::Intermediate => &[&BASIC_TASKS, &INTERMEDIATE_EXTRA_TASKS],
            Self::Full => &[&BASIC_TASKS, &INTERMEDIATE_EXTRA_TASKS, &FULL_EXTRA_TASKS],
            Self::Custom => &[],
        };
        groups
            .iter()
            .flat_map(|group| group.iter().copied().map(TaskCode::from_static))
            .collect()
    }
}

impl fmt::Display for ServicePackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

const STANDARD_TASKS: [(&str, &str, u32, TaskCategory); 20] = [
    ("T001", "Oil Change", 25, TaskCategory::Lubrication),
    ("T002", "Oil Filter Replacement", 15, TaskCategory::Lubrication),
    ("T003", "Air Filter Check", 15, TaskCategory::Filters),
    ("T004", "Fluid Levels Check", 30, TaskCategory::Fluids),
    ("T005", "Tyre Pressure Check", 15, TaskCategory::Tyres),
    ("T006", "Visual Inspection", 20, TaskCategory::Inspection),
    ("T007", "Brake Inspection", 30, TaskCategory::Brakes),
    ("T008", "Tyre Condition and Alignment Check", 30, TaskCategory::Tyres),
    ("T009", "Battery Check", 25, TaskCategory::Electrical),
    ("T010", "Exhaust System Inspection", 45, TaskCategory::Exhaust),
    ("T011", "Steering and Suspension Check", 60, TaskCategory::SteeringSuspension),
    ("T012", "Lights and Wipers Check", 20, TaskCategory::Electrical),
    ("T013", "Fuel System Inspection", 65, TaskCategory::FuelSystem),
    ("T014", "Transmission Check", 120, TaskCategory::Transmission),
    ("T015", "Spark Plugs Replacement", 180, TaskCategory::Ignition),
    ("T016", "Timing Belt Inspection", 35, TaskCategory::EngineTiming),
    ("T017", "Wheel Alignment and Balancing", 30, TaskCategory::SteeringSuspension),
    ("T018", "Cabin Filter Replacement", 20, TaskCategory::Filters),
    ("T019", "Comprehensive Diagnostic Check", 120, TaskCategory::Diagnostics),
    ("T020", "Underbody Inspection", 60, TaskCategory::Inspection),
];

/// Lookup table of known tasks keyed by code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskCatalogue {
    tasks: BTreeMap<TaskCode, TaskDefinition>,
}

impl TaskCatalogue {
    /// Creates a catalogue from task definitions. Later duplicates replace
    /// earlier ones.
    #[must_use]
    pub fn new(definitions: impl IntoIterator<Item = TaskDefinition>) -> Self {
        let tasks = definitions
            .into_iter()
            .map(|definition| (definition.code.clone(), definition))
            .collect();
        Self { tasks }
    }

    /// Returns the twenty-task workshop catalogue (`T001`–`T020`).
    #[must_use]
    pub fn standard() -> Self {
        let tasks = STANDARD_TASKS
            .iter()
            .map(|&(code, name, standard_minutes, category)| {
                let definition = TaskDefinition {
                    code: TaskCode::from_static(code),
                    name: name.to_owned(),
                    standard_minutes,
                    category,
                };
                (definition.code.clone(), definition)
            })
            .collect();
        Self { tasks }
    }

    /// Looks up a task definition.
    #[must_use]
    pub fn get(&self, code: &TaskCode) -> Option<&TaskDefinition> {
        self.tasks.get(code)
    }

    /// Returns the skill category for a task, if catalogued.
    #[must_use]
    pub fn category_of(&self, code: &TaskCode) -> Option<TaskCategory> {
        self.get(code).map(TaskDefinition::category)
    }

    /// Returns the standard minutes for a task, if catalogued.
    #[must_use]
    pub fn standard_minutes(&self, code: &TaskCode) -> Option<u32> {
        self.get(code).map(TaskDefinition::standard_minutes)
    }

    /// Iterates over all definitions in code order.
    pub fn iter(&self) -> impl Iterator<Item = &TaskDefinition> {
        self.tasks.values()
    }

    /// Returns the number of catalogued tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns whether the catalogue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Resolves the task definitions for a service package.
    ///
    /// For [`ServicePackage::Custom`] the `custom_tasks` list is used; for
    /// every other package it is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopDomainError::UnknownTask`] when a code is not
    /// catalogued, or [`WorkshopDomainError::EmptyJob`] when the resolved
    /// list is empty.
    pub fn resolve_package(
        &self,
        package: ServicePackage,
        custom_tasks: &[TaskCode],
    ) -> Result<Vec<TaskDefinition>, WorkshopDomainError> {
        let codes = match package {
            ServicePackage::Custom => custom_tasks.to_vec(),
            _ => package.task_codes(),
        };
        if codes.is_empty() {
            return Err(WorkshopDomainError::EmptyJob(
                package.display_name().to_owned(),
            ));
        }
        codes
            .into_iter()
            .map(|code| {
                self.get(&code)
                    .cloned()
                    .ok_or(WorkshopDomainError::UnknownTask(code))
            })
            .collect()
    }
}
