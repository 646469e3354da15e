//! Competing assignments for a single engineer.

use super::helpers::{
    dispatch, engineer, engineer_id, ensure_availability_matches_tasks, record, task_code,
};
use rstest::rstest;
use torque::workshop::{
    domain::{ServicePackage, Vehicle},
    ports::EngineerRepository,
    services::CreateJobRequest,
};

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn one_engineer_is_never_assigned_twice() -> Result<(), eyre::Report> {
    let dispatch = dispatch(
        &[engineer("E1", 12)],
        &[record("T001", "E1", 25, 24, 4)],
    )
    .await;
    let request = || {
        CreateJobRequest::new(ServicePackage::Custom, Vehicle::new("Mazda", "3"))
            .with_custom_tasks([task_code("T001")])
    };
    let first = dispatch.lifecycle.create_job(request()).await?;
    let second = dispatch.lifecycle.create_job(request()).await?;

    let t001 = task_code("T001");
    let (left, right) = tokio::join!(
        dispatch.coordinator.assign_task(first.id(), &t001),
        dispatch.coordinator.assign_task(second.id(), &t001),
    );

    let successes = [left.is_ok(), right.is_ok()]
        .into_iter()
        .filter(|ok| *ok)
        .count();
    assert_eq!(successes, 1);
    let failure = left
        .err()
        .or(right.err())
        .ok_or_else(|| eyre::eyre!("one assignment should fail"))?;
    assert!(failure.is_recoverable(), "unexpected failure: {failure}");

    let status = dispatch.lifecycle.status().await?;
    assert_eq!(status.assigned, 1);
    assert_eq!(status.pending, 1);
    let e1 = dispatch
        .workshop
        .find_engineer(&engineer_id("E1"))
        .await?
        .ok_or_else(|| eyre::eyre!("E1 missing"))?;
    assert!(!e1.is_available());
    ensure_availability_matches_tasks(&dispatch.workshop).await
}
