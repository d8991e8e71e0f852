//! Request bodies in, response bodies out.

use super::helpers::{Harness, harness, store_counts};
use rstest::rstest;
use serde_json::{Value, json};
use stateward::task::services::{
    ChangeStateRequest, CreateTaskRequest, CurrentStateView, TaskLifecycleError,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn history_body_matches_wire_shape(harness: Harness) -> Result<(), eyre::Report> {
    let create = CreateTaskRequest::from_body(&json!({
        "task_name": "Payment",
        "task_identifier": "pay-42",
        "state": "init",
    }))?;
    harness.service.create_task(create).await?;

    let change = ChangeStateRequest::from_body(&json!({
        "state": "processing",
        "service": {
            "type": "http",
            "upstream_url": "https://psp.example.com/charge",
            "method": "post",
            "headers": {"Idempotency-Key": "k-1"},
            "dataIn": {"amount": 1200},
            "dataOut": {"status": "accepted"},
        },
    }))?;
    harness.service.change_state("pay-42", change).await?;

    let history = harness.service.history("pay-42").await?;
    let body = serde_json::to_value(&history)?;
    let entries = body
        .as_array()
        .ok_or_else(|| eyre::eyre!("history body should be a list"))?;
    let [latest, initial] = entries.as_slice() else {
        return Err(eyre::eyre!("expected two entries, got {}", entries.len()));
    };

    assert_eq!(latest["task_identifier"], json!("pay-42"));
    assert_eq!(latest["state"], json!("processing"));
    let service = &latest["service"];
    assert_eq!(service["upstream_url"], json!("https://psp.example.com/charge"));
    assert_eq!(service["method"], json!("post"));
    assert_eq!(service["headers"], json!({"Idempotency-Key": "k-1"}));
    assert_eq!(service["dataIn"], json!({"amount": 1200}));
    assert_eq!(service["dataOut"], json!({"status": "accepted"}));
    assert!(service.get("created_at").is_some());

    assert_eq!(initial["state"], json!("init"));
    assert_eq!(initial["service"], Value::Null);
    assert!(latest["id"].as_i64() > initial["id"].as_i64());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn current_state_body_names_state(harness: Harness) -> Result<(), eyre::Report> {
    harness
        .service
        .create_task(CreateTaskRequest::new("Payment", "pay-1", "fail"))
        .await?;

    let state = harness.service.current_state("pay-1").await?;

    assert_eq!(
        serde_json::to_value(CurrentStateView::from(state))?,
        json!({"current_state": "fail"})
    );
    Ok(())
}

#[rstest]
#[case(json!({"name": "T", "identifier": "t-1", "state": "init", "service": null}), 400)]
#[case(json!({"name": "T", "identifier": "t-1", "state": "init", "service": "http"}), 400)]
#[case(json!({"name": "T", "identifier": "t-1", "state": "init", "service": {}}), 406)]
#[case(json!({"name": "T", "identifier": "t-1", "state": "init", "service": {"type": "soap"}}), 406)]
#[case(json!({"name": "T", "identifier": "t-1", "state": "init", "service": {"type": "http"}}), 400)]
#[case(json!({"name": "T", "identifier": "t-1", "state": "waiting"}), 400)]
#[case(json!({"name": "T", "identifier": "t-1"}), 400)]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_create_bodies_map_to_status_and_leave_store_empty(
    harness: Harness,
    #[case] body: Value,
    #[case] expected_status: u16,
) -> Result<(), eyre::Report> {
    let outcome = match CreateTaskRequest::from_body(&body) {
        Ok(request) => harness.service.create_task(request).await.map(|_| ()),
        Err(err) => Err(TaskLifecycleError::from(err)),
    };

    let Err(err) = outcome else {
        return Err(eyre::eyre!("body should be rejected: {body}"));
    };
    assert_eq!(err.status_code(), expected_status);
    assert_eq!(store_counts(&harness.store)?, (0, 0, 0));
    Ok(())
}
