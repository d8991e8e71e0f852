//! End-to-end lifecycle sequences through the coordinator.

use super::helpers::{Harness, harness, http_service, store_counts};
use rstest::rstest;
use stateward::{
    service::domain::HttpMethod,
    task::{
        domain::TaskState,
        services::{ChangeStateRequest, CreateTaskRequest, ServiceView, TaskLifecycleError},
    },
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn abc_1_sequence_builds_expected_history(harness: Harness) -> Result<(), eyre::Report> {
    let service = &harness.service;
    service
        .create_task(CreateTaskRequest::new("T", "abc-1", "init"))
        .await?;
    service
        .change_state(
            "abc-1",
            ChangeStateRequest::new("processing")
                .with_service(http_service("https://api.example.com/x")),
        )
        .await?;
    service
        .change_state("abc-1", ChangeStateRequest::new("complete"))
        .await?;

    assert_eq!(service.current_state("abc-1").await?, TaskState::Complete);

    let history = service.history("abc-1").await?;
    let summary: Vec<(TaskState, bool)> = history
        .iter()
        .map(|entry| (entry.state, entry.service.is_some()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (TaskState::Complete, false),
            (TaskState::Processing, true),
            (TaskState::Init, false),
        ]
    );

    let Some(ServiceView::Http(http)) = history.get(1).and_then(|entry| entry.service.clone())
    else {
        return Err(eyre::eyre!("processing entry should carry an HTTP service"));
    };
    assert_eq!(http.upstream_url.as_str(), "https://api.example.com/x");
    assert_eq!(http.method, HttpMethod::Post);
    assert_eq!(store_counts(&harness.store)?, (1, 3, 1));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn change_state_on_unknown_identifier_writes_nothing(
    harness: Harness,
) -> Result<(), eyre::Report> {
    let result = harness
        .service
        .change_state(
            "nope",
            ChangeStateRequest::new("complete")
                .with_service(http_service("https://api.example.com/x")),
        )
        .await;

    let Err(err) = result else {
        return Err(eyre::eyre!("unknown identifier must be rejected"));
    };
    assert!(matches!(err, TaskLifecycleError::NotFound(ref identifier) if identifier == "nope"));
    assert_eq!(err.status_code(), 404);
    assert_eq!(store_counts(&harness.store)?, (0, 0, 0));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn each_task_sees_only_its_own_history(harness: Harness) -> Result<(), eyre::Report> {
    let service = &harness.service;
    for identifier in ["order-1", "order-2"] {
        service
            .create_task(CreateTaskRequest::new("Order", identifier, "init"))
            .await?;
    }
    service
        .change_state("order-2", ChangeStateRequest::new("fail"))
        .await?;
    service
        .change_state("order-2", ChangeStateRequest::new("restart"))
        .await?;

    let first = service.history("order-1").await?;
    let second = service.history("order-2").await?;

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 3);
    assert!(
        second
            .iter()
            .all(|entry| entry.task_identifier.as_str() == "order-2")
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_task_exposes_full_record(harness: Harness) -> Result<(), eyre::Report> {
    let created = harness
        .service
        .create_task(CreateTaskRequest::new("  Nightly sync ", "sync-7", "processing"))
        .await?;

    let found = harness.service.find_task("sync-7").await?;

    assert_eq!(found.name().as_str(), "Nightly sync");
    assert_eq!(found.state(), TaskState::Processing);
    assert_eq!(found.created_at(), created.created_at());
    assert_eq!(found.to_string(), format!("{} -> Nightly sync || processing", found.id()));
    Ok(())
}
