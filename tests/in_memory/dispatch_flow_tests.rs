//! End-to-end dispatch flows over the in-memory workshop.

use super::helpers::{
    Dispatch, at_minute, dispatch, engineer, engineer_id, standard_history, task_code,
};
use rstest::{fixture, rstest};
use torque::estimation::EstimateSource;
use torque::workshop::{
    domain::{ServicePackage, TaskStatus, Urgency, Vehicle, WorkshopDomainError},
    ports::{EngineerRepository, WorkshopRepositoryError},
    services::{
        CompleteTaskRequest, CreateJobRequest, JobLifecycleError, StartTaskRequest,
        TaskAssignmentOutcome,
    },
};

#[fixture]
async fn two_engineers() -> Dispatch {
    dispatch(&[engineer("E1", 10), engineer("E2", 3)], &standard_history()).await
}

fn oil_service() -> CreateJobRequest {
    CreateJobRequest::new(
        ServicePackage::Custom,
        Vehicle::new("Vauxhall", "Astra").with_mileage(61_000),
    )
    .with_urgency(Urgency::High)
    .with_custom_tasks([task_code("T001"), task_code("T002")])
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn job_runs_from_creation_to_relearned_estimate(
    #[future] two_engineers: Dispatch,
) -> Result<(), eyre::Report> {
    let dispatch = two_engineers.await;
    let job = dispatch.lifecycle.create_job(oil_service()).await?;

    let report = dispatch.coordinator.assign_job(job.id()).await?;
    eyre::ensure!(report.assigned_count() == 2, "both tasks should be assigned");
    let assigned: Vec<(&str, &str)> = report
        .outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            TaskAssignmentOutcome::Assigned(assignment) => {
                Some((assignment.task.as_str(), assignment.engineer.as_str()))
            }
            _ => None,
        })
        .collect();
    assert_eq!(assigned, [("T001", "E1"), ("T002", "E2")]);
    let estimate = report
        .estimate
        .ok_or_else(|| eyre::eyre!("job estimate missing"))?;
    assert_eq!(estimate.total_minutes, 38);

    dispatch
        .lifecycle
        .start_task(StartTaskRequest::new(job.id(), task_code("T001")).with_started_at(at_minute(0)))
        .await?;
    let completed = dispatch
        .lifecycle
        .complete_task(
            CompleteTaskRequest::new(job.id(), task_code("T001"), 5)
                .with_finished_at(at_minute(10)),
        )
        .await?;
    assert_eq!(completed.minutes_taken(), 10);
    assert_eq!(completed.urgency(), Urgency::High);

    let status = dispatch.lifecycle.status().await?;
    assert_eq!(status.active_jobs, 1);
    assert_eq!(status.assigned, 1);
    assert_eq!(status.available_engineers, 1);
    assert_eq!(status.busy_engineers, 1);

    let rebuilt = dispatch.registry.rebuild().await?;
    assert_eq!(rebuilt.record_count(), standard_history().len() + 1);
    let relearned = dispatch
        .estimator
        .estimate_task(&task_code("T001"), &engineer_id("E1"))
        .await?;
    // (20 + 22 + 21 + 10) / 4 = 18.25, blended evenly with 25.
    assert_eq!(relearned.minutes, 22);
    assert_eq!(relearned.source, EstimateSource::Blended);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completing_every_task_retires_the_job(
    #[future] two_engineers: Dispatch,
) -> Result<(), eyre::Report> {
    let dispatch = two_engineers.await;
    let job = dispatch.lifecycle.create_job(oil_service()).await?;
    dispatch.coordinator.assign_job(job.id()).await?;

    for (task, minutes) in [("T001", 12), ("T002", 14)] {
        dispatch
            .lifecycle
            .start_task(StartTaskRequest::new(job.id(), task_code(task)).with_started_at(at_minute(0)))
            .await?;
        dispatch
            .lifecycle
            .complete_task(
                CompleteTaskRequest::new(job.id(), task_code(task), 4)
                    .with_finished_at(at_minute(minutes)),
            )
            .await?;
    }

    assert!(dispatch.lifecycle.find_job(job.id()).await?.is_none());
    let status = dispatch.lifecycle.status().await?;
    assert_eq!(status.active_jobs, 0);
    assert_eq!(status.total_tasks(), 0);
    assert_eq!(status.available_engineers, 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn released_task_returns_to_pending_and_frees_engineer(
    #[future] two_engineers: Dispatch,
) -> Result<(), eyre::Report> {
    let dispatch = two_engineers.await;
    let job = dispatch
        .lifecycle
        .create_job(
            CreateJobRequest::new(ServicePackage::Custom, Vehicle::new("Kia", "Ceed"))
                .with_custom_tasks([task_code("T001")]),
        )
        .await?;
    let assignment = dispatch
        .coordinator
        .assign_task(job.id(), &task_code("T001"))
        .await?;
    assert_eq!(assignment.engineer, engineer_id("E1"));

    let released = dispatch
        .lifecycle
        .release_task(job.id(), task_code("T001"))
        .await?;

    assert_eq!(released, engineer_id("E1"));
    let active = dispatch
        .lifecycle
        .find_job(job.id())
        .await?
        .ok_or_else(|| eyre::eyre!("job should stay active"))?;
    let task = active
        .task(&task_code("T001"))
        .ok_or_else(|| eyre::eyre!("task missing"))?;
    assert_eq!(task.status(), TaskStatus::Pending);
    assert!(task.engineer().is_none());
    let e1 = dispatch
        .workshop
        .find_engineer(&engineer_id("E1"))
        .await?
        .ok_or_else(|| eyre::eyre!("E1 missing"))?;
    assert!(e1.is_available());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sweep_reports_tasks_without_history_and_skips_estimate(
    #[future] two_engineers: Dispatch,
) -> Result<(), eyre::Report> {
    let dispatch = two_engineers.await;
    let job = dispatch
        .lifecycle
        .create_job(
            CreateJobRequest::new(ServicePackage::Custom, Vehicle::new("Seat", "Leon"))
                .with_custom_tasks([task_code("T001"), task_code("T015")]),
        )
        .await?;

    let report = dispatch.coordinator.assign_job(job.id()).await?;

    assert_eq!(report.assigned_count(), 1);
    let failures: Vec<(&str, &str)> = report
        .failures()
        .map(|(task, reason)| (task.as_str(), reason))
        .collect();
    assert_eq!(failures, [("T015", "no history for task T015")]);
    assert!(report.estimate.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lifecycle_rejects_out_of_order_transitions(
    #[future] two_engineers: Dispatch,
) -> Result<(), eyre::Report> {
    let dispatch = two_engineers.await;
    let job = dispatch.lifecycle.create_job(oil_service()).await?;

    let early_start = dispatch
        .lifecycle
        .start_task(StartTaskRequest::new(job.id(), task_code("T001")))
        .await;
    assert!(matches!(
        early_start,
        Err(JobLifecycleError::Domain(
            WorkshopDomainError::InvalidStatusTransition { .. }
        ))
    ));

    dispatch
        .coordinator
        .assign_task(job.id(), &task_code("T001"))
        .await?;
    let early_finish = dispatch
        .lifecycle
        .complete_task(CompleteTaskRequest::new(job.id(), task_code("T001"), 4))
        .await;
    assert!(matches!(
        early_finish,
        Err(JobLifecycleError::Repository(
            WorkshopRepositoryError::InvalidTaskState(_)
        ))
    ));

    let bad_outcome = dispatch
        .lifecycle
        .complete_task(CompleteTaskRequest::new(job.id(), task_code("T001"), 7))
        .await;
    assert!(matches!(
        bad_outcome,
        Err(JobLifecycleError::Domain(WorkshopDomainError::InvalidOutcomeScore(7)))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn performance_recompute_reflects_new_completions(
    #[future] two_engineers: Dispatch,
) -> Result<(), eyre::Report> {
    let dispatch = two_engineers.await;
    let job = dispatch
        .lifecycle
        .create_job(
            CreateJobRequest::new(ServicePackage::Custom, Vehicle::new("Ford", "Puma"))
                .with_custom_tasks([task_code("T001")]),
        )
        .await?;
    dispatch
        .coordinator
        .assign_task(job.id(), &task_code("T001"))
        .await?;
    dispatch
        .lifecycle
        .start_task(StartTaskRequest::new(job.id(), task_code("T001")).with_started_at(at_minute(0)))
        .await?;
    dispatch
        .lifecycle
        .complete_task(
            CompleteTaskRequest::new(job.id(), task_code("T001"), 5)
                .with_finished_at(at_minute(10)),
        )
        .await?;

    let updated = dispatch.analyzer.recompute().await?;

    let e1 = updated
        .iter()
        .find(|profile| profile.id() == &engineer_id("E1"))
        .ok_or_else(|| eyre::eyre!("E1 not recomputed"))?;
    assert!((e1.customer_rating() - 4.75).abs() < 1e-9);
    assert!((e1.avg_completion_minutes() - 18.25).abs() < 1e-9);
    assert!(e1.is_available());
    Ok(())
}
