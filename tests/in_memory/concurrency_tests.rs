//! Racing writers against one store.

use super::helpers::{Harness, harness, store_counts};
use rstest::rstest;
use stateward::task::services::{ChangeStateRequest, CreateTaskRequest, TaskLifecycleError};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creates_with_one_identifier_admit_exactly_one(
    harness: Harness,
) -> Result<(), eyre::Report> {
    let mut handles = Vec::new();
    for attempt in 0..8 {
        let service = harness.service.clone();
        handles.push(tokio::spawn(async move {
            service
                .create_task(CreateTaskRequest::new(format!("Racer {attempt}"), "race-1", "init"))
                .await
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => created += 1,
            Err(TaskLifecycleError::Conflict(_)) => conflicts += 1,
            Err(other) => return Err(other.into()),
        }
    }

    assert_eq!((created, conflicts), (1, 7));
    assert_eq!(store_counts(&harness.store)?, (1, 1, 0));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_state_changes_all_reach_the_log(harness: Harness) -> Result<(), eyre::Report> {
    harness
        .service
        .create_task(CreateTaskRequest::new("Shared", "shared-1", "init"))
        .await?;

    let mut handles = Vec::new();
    for state in ["processing", "fail", "resume", "complete"] {
        let service = harness.service.clone();
        handles.push(tokio::spawn(async move {
            service
                .change_state("shared-1", ChangeStateRequest::new(state))
                .await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let history = harness.service.history("shared-1").await?;
    let latest = history
        .first()
        .ok_or_else(|| eyre::eyre!("history should not be empty"))?;

    assert_eq!(history.len(), 5);
    assert_eq!(harness.service.current_state("shared-1").await?, latest.state);
    Ok(())
}
