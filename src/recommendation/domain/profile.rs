//! Historical performance profiles derived from completed-task records.

use crate::stats::{mean, round2};
use crate::workshop::domain::{EngineerId, HistoricalTaskRecord, TaskCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The four behavioural features averaged into every profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Mean outcome score (1–5).
    pub outcome: f64,
    /// Mean outcome per minute taken.
    pub efficiency: f64,
    /// Mean urgency level times duration deviation.
    pub time_pressure: f64,
    /// Mean urgency level (1–3).
    pub urgency: f64,
}

impl FeatureVector {
    /// Returns the features as an array in a fixed order.
    #[must_use]
    pub const fn to_array(self) -> [f64; 4] {
        [self.outcome, self.efficiency, self.time_pressure, self.urgency]
    }

    /// Cosine similarity with another vector, or `None` when either vector
    /// has zero length.
    #[must_use]
    pub fn cosine_similarity(&self, other: &Self) -> Option<f64> {
        let left = self.to_array();
        let right = other.to_array();
        let dot: f64 = left.iter().zip(right.iter()).map(|(a, b)| a * b).sum();
        let norm = |values: &[f64; 4]| values.iter().map(|v| v * v).sum::<f64>().sqrt();
        let denominator = norm(&left) * norm(&right);
        (denominator > 0.0).then_some(dot / denominator)
    }

    fn average<'a>(vectors: impl Iterator<Item = &'a Self> + Clone) -> Option<Self> {
        Some(Self {
            outcome: mean(vectors.clone().map(|v| v.outcome))?,
            efficiency: mean(vectors.clone().map(|v| v.efficiency))?,
            time_pressure: mean(vectors.clone().map(|v| v.time_pressure))?,
            urgency: mean(vectors.map(|v| v.urgency))?,
        })
    }
}

/// Aggregated history of one engineer on one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineerTaskProfile {
    task: TaskCode,
    engineer: EngineerId,
    features: FeatureVector,
    samples: usize,
}

impl EngineerTaskProfile {
    /// Returns the task code.
    #[must_use]
    pub const fn task(&self) -> &TaskCode {
        &self.task
    }

    /// Returns the engineer identifier.
    #[must_use]
    pub const fn engineer(&self) -> &EngineerId {
        &self.engineer
    }

    /// Returns the averaged features.
    #[must_use]
    pub const fn features(&self) -> FeatureVector {
        self.features
    }

    /// Mean outcome score on this task.
    #[must_use]
    pub const fn mean_outcome(&self) -> f64 {
        self.features.outcome
    }

    /// Number of history records aggregated.
    #[must_use]
    pub const fn samples(&self) -> usize {
        self.samples
    }
}

/// Centroid of every engineer-task profile for one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskProfile {
    task: TaskCode,
    centroid: FeatureVector,
    engineers: usize,
}

impl TaskProfile {
    /// Returns the task code.
    #[must_use]
    pub const fn task(&self) -> &TaskCode {
        &self.task
    }

    /// Returns the centroid vector.
    #[must_use]
    pub const fn centroid(&self) -> FeatureVector {
        self.centroid
    }

    /// Number of engineers with history on the task.
    #[must_use]
    pub const fn engineers(&self) -> usize {
        self.engineers
    }
}

/// Another task whose profile resembles the requested one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarTask {
    /// Task code.
    pub task: TaskCode,
    /// Cosine similarity rounded to two decimals.
    pub similarity: f64,
}

/// Immutable snapshot of every profile derived from history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileStore {
    engineer_profiles: BTreeMap<TaskCode, BTreeMap<EngineerId, EngineerTaskProfile>>,
    task_profiles: BTreeMap<TaskCode, TaskProfile>,
    records: usize,
}

impl ProfileStore {
    /// Builds profiles from completed-task history.
    ///
    /// Pure and deterministic: the same records always yield an equal
    /// store.
    #[must_use]
    pub fn build(records: &[HistoricalTaskRecord]) -> Self {
        let mut grouped: BTreeMap<(TaskCode, EngineerId), Vec<FeatureVector>> = BTreeMap::new();
        for record in records {
            grouped
                .entry((record.task().clone(), record.engineer().clone()))
                .or_default()
                .push(FeatureVector {
                    outcome: f64::from(record.outcome().value()),
                    efficiency: record.efficiency(),
                    time_pressure: record.time_pressure(),
                    urgency: f64::from(record.urgency().level()),
                });
        }

        let mut engineer_profiles: BTreeMap<TaskCode, BTreeMap<EngineerId, EngineerTaskProfile>> =
            BTreeMap::new();
        for ((task, engineer), vectors) in grouped {
            let Some(features) = FeatureVector::average(vectors.iter()) else {
                continue;
            };
            engineer_profiles.entry(task.clone()).or_default().insert(
                engineer.clone(),
                EngineerTaskProfile {
                    task,
                    engineer,
                    features,
                    samples: vectors.len(),
                },
            );
        }

        let task_profiles = engineer_profiles
            .iter()
            .filter_map(|(task, engineers)| {
                let centroid =
                    FeatureVector::average(engineers.values().map(|profile| &profile.features))?;
                Some((
                    task.clone(),
                    TaskProfile {
                        task: task.clone(),
                        centroid,
                        engineers: engineers.len(),
                    },
                ))
            })
            .collect();

        Self {
            engineer_profiles,
            task_profiles,
            records: records.len(),
        }
    }

    /// Returns the task centroid profile, if the task has history.
    #[must_use]
    pub fn task_profile(&self, task: &TaskCode) -> Option<&TaskProfile> {
        self.task_profiles.get(task)
    }

    /// Returns every engineer profile on a task, keyed by engineer.
    #[must_use]
    pub fn engineers_for(
        &self,
        task: &TaskCode,
    ) -> Option<&BTreeMap<EngineerId, EngineerTaskProfile>> {
        self.engineer_profiles.get(task)
    }

    /// Returns one engineer's profile on a task.
    #[must_use]
    pub fn engineer_task_profile(
        &self,
        task: &TaskCode,
        engineer: &EngineerId,
    ) -> Option<&EngineerTaskProfile> {
        self.engineer_profiles
            .get(task)
            .and_then(|engineers| engineers.get(engineer))
    }

    /// Ranks other tasks by cosine similarity of their centroids.
    ///
    /// Results are ordered by descending similarity, then task code, and
    /// truncated to `limit`. Tasks with a zero-length centroid are skipped.
    #[must_use]
    pub fn similar_tasks(&self, task: &TaskCode, limit: usize) -> Vec<SimilarTask> {
        let Some(target) = self.task_profiles.get(task) else {
            return Vec::new();
        };
        let mut similar: Vec<SimilarTask> = self
            .task_profiles
            .values()
            .filter(|profile| &profile.task != task)
            .filter_map(|profile| {
                let similarity = target.centroid.cosine_similarity(&profile.centroid)?;
                Some(SimilarTask {
                    task: profile.task.clone(),
                    similarity: round2(similarity),
                })
            })
            .collect();
        similar.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then_with(|| a.task.cmp(&b.task))
        });
        similar.truncate(limit);
        similar
    }

    /// Iterates over task profiles in task-code order.
    pub fn task_profiles(&self) -> impl Iterator<Item = &TaskProfile> {
        self.task_profiles.values()
    }

    /// Number of tasks with history.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.task_profiles.len()
    }

    /// Number of history records the store was built from.
    #[must_use]
    pub const fn record_count(&self) -> usize {
        self.records
    }
}
