//! Given steps for recommendation BDD scenarios.

use super::world::{RecommendationWorld, run_async};
use chrono::Utc;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use torque::workshop::{
    domain::{
        Availability, EngineerId, EngineerProfile, HistoricalTaskRecord, JobId, NewEngineer,
        NewHistoricalRecord, OutcomeScore, TaskCode, Urgency, Vehicle,
    },
    ports::{EngineerRepository, HistoryRepository},
};

#[given(r#"engineer "{id}" with {years:u32} years of experience"#)]
fn engineer_with_experience(
    world: &mut RecommendationWorld,
    id: String,
    years: u32,
) -> Result<(), eyre::Report> {
    let profile = EngineerProfile::new(NewEngineer {
        id: EngineerId::new(id)?,
        name: "Scenario engineer".to_owned(),
        availability: Availability::Yes,
        years_of_experience: years,
        avg_completion_minutes: 30.0,
        specialization: "All Makes".to_owned(),
        customer_rating: 4.0,
        overall_performance: 80.0,
        skill_scores: std::collections::BTreeMap::new(),
    })?;
    run_async(world.workshop.store_engineer(&profile)).wrap_err("store scenario engineer")?;
    Ok(())
}

#[given(r#""{engineer}" completed task "{task}" in {minutes:u32} minutes with outcome {outcome:u8}"#)]
fn completed_task(
    world: &mut RecommendationWorld,
    engineer: String,
    task: String,
    minutes: u32,
    outcome: u8,
) -> Result<(), eyre::Report> {
    let code = TaskCode::new(task)?;
    let estimated_minutes = world
        .catalogue
        .standard_minutes(&code)
        .ok_or_else(|| eyre::eyre!("task {code} is not catalogued"))?;
    let record = HistoricalTaskRecord::new(NewHistoricalRecord {
        job_id: JobId::new(),
        task: code,
        engineer: EngineerId::new(engineer)?,
        description: "Scenario history".to_owned(),
        vehicle: Vehicle::new("Peugeot", "208"),
        urgency: Urgency::Normal,
        estimated_minutes,
        minutes_taken: minutes,
        outcome: OutcomeScore::new(outcome)?,
        completed_at: Utc::now(),
    })?;
    run_async(world.workshop.append_record(&record)).wrap_err("append scenario history")?;
    Ok(())
}

#[given(r#"engineer "{id}" is unavailable"#)]
fn engineer_is_unavailable(world: &mut RecommendationWorld, id: String) -> Result<(), eyre::Report> {
    let engineer = EngineerId::new(id)?;
    let mut profile = run_async(world.workshop.find_engineer(&engineer))?
        .ok_or_else(|| eyre::eyre!("engineer {engineer} missing from scenario world"))?;
    profile.reserve()?;
    run_async(world.workshop.update_engineer(&profile)).wrap_err("mark engineer busy")?;
    Ok(())
}
