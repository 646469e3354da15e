//! Shared builders for in-memory dispatch integration tests.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use mockable::DefaultClock;
use torque::config::{DispatchConfig, TieBreakConfig, TieBreakPolicy};
use torque::estimation::DynamicEstimator;
use torque::recommendation::services::{ProfileRegistry, RecommendationEngine};
use torque::workshop::{
    adapters::memory::InMemoryWorkshop,
    domain::{
        Availability, EngineerId, EngineerProfile, HistoricalTaskRecord, JobId, NewEngineer,
        NewHistoricalRecord, OutcomeScore, TaskCatalogue, TaskCode, Urgency, Vehicle,
    },
    ports::{EngineerRepository, HistoryRepository, JobRepository},
    services::{AssignmentCoordinator, JobLifecycleService, PerformanceAnalyzer},
};

/// Coordinator type used across integration tests.
pub type TestCoordinator = AssignmentCoordinator<InMemoryWorkshop, DefaultClock>;

/// Every service wired over one in-memory workshop.
pub struct Dispatch {
    pub workshop: Arc<InMemoryWorkshop>,
    pub registry: Arc<ProfileRegistry<InMemoryWorkshop>>,
    pub lifecycle: JobLifecycleService<InMemoryWorkshop, DefaultClock>,
    pub coordinator: TestCoordinator,
    pub estimator: DynamicEstimator<InMemoryWorkshop>,
    pub analyzer: PerformanceAnalyzer<InMemoryWorkshop>,
}

/// Parses an engineer identifier.
pub fn engineer_id(id: &str) -> EngineerId {
    EngineerId::new(id).expect("valid engineer id")
}

/// Parses a task code.
pub fn task_code(code: &str) -> TaskCode {
    TaskCode::new(code).expect("valid task code")
}

/// Timestamp `minute` minutes past 08:00 on a fixed test day.
pub fn at_minute(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 13, 8, minute, 0)
        .single()
        .expect("valid timestamp")
}

/// Available engineer with neutral ratings and no skill scores.
pub fn engineer(id: &str, years: u32) -> EngineerProfile {
    EngineerProfile::new(NewEngineer {
        id: engineer_id(id),
        name: format!("Engineer {id}"),
        availability: Availability::Yes,
        years_of_experience: years,
        avg_completion_minutes: 30.0,
        specialization: "All Makes".to_owned(),
        customer_rating: 4.0,
        overall_performance: 80.0,
        skill_scores: std::collections::BTreeMap::new(),
    })
    .expect("valid engineer")
}

/// Normal-urgency history record completed at the start of the test day.
pub fn record(
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
        vehicle: Vehicle::new("Toyota", "Yaris"),
        urgency: Urgency::Normal,
        estimated_minutes,
        minutes_taken,
        outcome: OutcomeScore::new(outcome).expect("valid outcome"),
        completed_at: at_minute(0),
    })
    .expect("valid record")
}

/// History used by most scenarios: E1 is strong on oil changes, E2 is
/// the only engineer with oil-filter history.
pub fn standard_history() -> Vec<HistoricalTaskRecord> {
    vec![
        record("T001", "E1", 25, 20, 5),
        record("T001", "E1", 25, 22, 5),
        record("T001", "E1", 25, 21, 4),
        record("T001", "E2", 25, 30, 3),
        record("T001", "E2", 25, 35, 2),
        record("T002", "E2", 15, 15, 4),
    ]
}

/// Seeds a workshop and wires every service over it with deterministic
/// tie-breaking.
pub async fn dispatch(
    engineers: &[EngineerProfile],
    history: &[HistoricalTaskRecord],
) -> Dispatch {
    let workshop = Arc::new(InMemoryWorkshop::new());
    for profile in engineers {
        workshop
            .store_engineer(profile)
            .await
            .expect("engineer stored");
    }
    for entry in history {
        workshop.append_record(entry).await.expect("record stored");
    }

    let config = DispatchConfig {
        tie_break: TieBreakConfig {
            policy: TieBreakPolicy::First,
            margin: 5.0,
        },
        ..DispatchConfig::default()
    };
    let catalogue = Arc::new(TaskCatalogue::standard());
    let clock = Arc::new(DefaultClock);
    let registry = Arc::new(
        ProfileRegistry::load(Arc::clone(&workshop))
            .await
            .expect("profiles build"),
    );
    let engine = Arc::new(RecommendationEngine::new(
        Arc::clone(&workshop),
        Arc::clone(&registry),
        Arc::clone(&catalogue),
        &config,
    ));
    let estimator = DynamicEstimator::new(
        Arc::clone(&workshop),
        Arc::clone(&catalogue),
        config.estimator,
    );

    Dispatch {
        lifecycle: JobLifecycleService::new(
            Arc::clone(&workshop),
            Arc::clone(&catalogue),
            Arc::clone(&clock),
        ),
        coordinator: AssignmentCoordinator::new(
            Arc::clone(&workshop),
            engine,
            estimator.clone(),
            clock,
        ),
        analyzer: PerformanceAnalyzer::new(Arc::clone(&workshop), catalogue),
        estimator,
        registry,
        workshop,
    }
}

/// Fails unless the engineers flagged unavailable are exactly those holding
/// an assigned or in-progress task.
pub async fn ensure_availability_matches_tasks(
    workshop: &InMemoryWorkshop,
) -> Result<(), eyre::Report> {
    let jobs = workshop.list_active_jobs().await?;
    let holding: BTreeSet<EngineerId> = jobs
        .iter()
        .flat_map(|job| job.tasks())
        .filter(|task| task.status().holds_engineer())
        .filter_map(|task| task.engineer().cloned())
        .collect();
    let busy: BTreeSet<EngineerId> = workshop
        .list_engineers()
        .await?
        .into_iter()
        .filter(|profile| !profile.is_available())
        .map(|profile| profile.id().clone())
        .collect();
    eyre::ensure!(
        holding == busy,
        "engineers holding tasks {holding:?} differ from busy engineers {busy:?}"
    );
    Ok(())
}
