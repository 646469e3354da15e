//! When steps for recommendation BDD scenarios.

use std::sync::Arc;

use super::world::{RecommendationWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use torque::config::{DispatchConfig, TieBreakPolicy};
use torque::estimation::DynamicEstimator;
use torque::recommendation::services::{ProfileRegistry, RecommendationEngine};
use torque::workshop::domain::{EngineerId, TaskCode};

#[when(r#"engineers are recommended for task "{task}""#)]
fn recommend_for_task(world: &mut RecommendationWorld, task: String) -> Result<(), eyre::Report> {
    let mut config = DispatchConfig::default();
    config.tie_break.policy = TieBreakPolicy::First;
    let registry = run_async(ProfileRegistry::load(Arc::clone(&world.workshop)))
        .wrap_err("build scenario profiles")?;
    let engine = RecommendationEngine::new(
        Arc::clone(&world.workshop),
        Arc::new(registry),
        Arc::clone(&world.catalogue),
        &config,
    );
    let code = TaskCode::new(task)?;
    world.last_recommendation = Some(run_async(engine.recommend(&code, 5)));
    Ok(())
}

#[when(r#"the duration of task "{task}" is estimated for engineer "{engineer}""#)]
fn estimate_duration(
    world: &mut RecommendationWorld,
    task: String,
    engineer: String,
) -> Result<(), eyre::Report> {
    let estimator = DynamicEstimator::new(
        Arc::clone(&world.workshop),
        Arc::clone(&world.catalogue),
        DispatchConfig::default().estimator,
    );
    let code = TaskCode::new(task)?;
    let engineer_id = EngineerId::new(engineer)?;
    world.last_estimate = Some(run_async(estimator.estimate_task(&code, &engineer_id)));
    Ok(())
}
