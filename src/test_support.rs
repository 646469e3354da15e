//! Builders shared by unit tests across contexts.

use crate::workshop::{
    adapters::memory::InMemoryWorkshop,
    domain::{
        Availability, EngineerId, EngineerProfile, HistoricalTaskRecord, JobId, NewEngineer,
        NewHistoricalRecord, OutcomeScore, TaskCategory, TaskCode, Urgency, Vehicle,
    },
    ports::{EngineerRepository, HistoryRepository},
};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

pub(crate) fn engineer_id(id: &str) -> EngineerId {
    EngineerId::new(id).expect("valid engineer id")
}

pub(crate) fn task_code(code: &str) -> TaskCode {
    TaskCode::new(code).expect("valid task code")
}

pub(crate) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) fn new_engineer(id: &str, years: u32) -> NewEngineer {
    NewEngineer {
        id: engineer_id(id),
        name: format!("Engineer {id}"),
        availability: Availability::Yes,
        years_of_experience: years,
        avg_completion_minutes: 30.0,
        specialization: "All Makes".to_owned(),
        customer_rating: 4.0,
        overall_performance: 80.0,
        skill_scores: BTreeMap::new(),
    }
}

pub(crate) fn engineer(id: &str, years: u32) -> EngineerProfile {
    EngineerProfile::new(new_engineer(id, years)).expect("valid engineer")
}

pub(crate) fn unavailable_engineer(id: &str, years: u32) -> EngineerProfile {
    EngineerProfile::new(NewEngineer {
        availability: Availability::No,
        ..new_engineer(id, years)
    })
    .expect("valid engineer")
}

pub(crate) fn skilled_engineer(
    id: &str,
    years: u32,
    skills: &[(TaskCategory, f64)],
) -> EngineerProfile {
    EngineerProfile::new(NewEngineer {
        skill_scores: skills.iter().copied().collect(),
        ..new_engineer(id, years)
    })
    .expect("valid engineer")
}

pub(crate) fn record(
    task: &str,
    engineer: &str,
    estimated_minutes: u32,
    minutes_taken: u32,
    outcome: u8,
) -> HistoricalTaskRecord {
    HistoricalTaskRecord::new(NewHistoricalRecord {
        job_id: JobId::new(),
        task: task_code(task),
        engineer: engineer_id(engineer),
        description: format!("{task} work"),
        vehicle: Vehicle::new("Toyota", "Corolla"),
        urgency: Urgency::Normal,
        estimated_minutes,
        minutes_taken,
        outcome: OutcomeScore::new(outcome).expect("valid outcome"),
        completed_at: base_time(),
    })
    .expect("valid record")
}

/// Engineer E1 (10 years) on T001: outcomes 5, 5, 4 in 20, 22 and 21
/// minutes against a 25-minute standard.
pub(crate) fn e1_t001_history() -> Vec<HistoricalTaskRecord> {
    vec![
        record("T001", "E1", 25, 20, 5),
        record("T001", "E1", 25, 22, 5),
        record("T001", "E1", 25, 21, 4),
    ]
}

pub(crate) async fn seeded_workshop(
    engineers: &[EngineerProfile],
    history: &[HistoricalTaskRecord],
) -> Arc<InMemoryWorkshop> {
    let workshop = InMemoryWorkshop::new();
    for profile in engineers {
        workshop
            .store_engineer(profile)
            .await
            .expect("engineer stored");
    }
    for entry in history {
        workshop.append_record(entry).await.expect("record stored");
    }
    Arc::new(workshop)
}
