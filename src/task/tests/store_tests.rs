//! Transaction scope tests for the in-memory lifecycle store.

use crate::service::{
    domain::{
        HttpServiceRecord, HttpServiceSpec, ServiceKind, ServiceRecordId, ServiceRef, ServiceSpec,
        UpstreamUrl,
    },
    ports::ServiceRecordReader,
    services::{persist_service, resolve_service},
};
use crate::task::{
    adapters::memory::InMemoryLifecycleStore,
    domain::{NewTransition, Task, TaskId, TaskIdentifier, TaskName, TaskState},
    ports::{LifecycleStore, LifecycleStoreError},
};
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};

#[fixture]
fn store() -> InMemoryLifecycleStore {
    InMemoryLifecycleStore::new()
}

fn task(identifier: &str) -> Task {
    Task::new(
        TaskName::new("Task").expect("valid name"),
        TaskIdentifier::new(identifier).expect("valid identifier"),
        TaskState::Init,
        &DefaultClock,
    )
}

fn http_spec() -> ServiceSpec {
    ServiceSpec::Http(HttpServiceSpec::new(
        UpstreamUrl::new("https://api.example.com/x").expect("valid URL"),
    ))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_work_rolls_back_every_write(store: InMemoryLifecycleStore) {
    let pending = task("abc-1");
    let result: Result<(), _> = store
        .in_transaction(move |tx| {
            let at = pending.created_at();
            let reference = persist_service(&http_spec(), tx, at)?;
            tx.insert_task(&pending)?;
            tx.append_transition(&NewTransition::new(
                pending.id(),
                pending.state(),
                Some(reference),
                at,
            ))?;
            Err(LifecycleStoreError::persistence(std::io::Error::other(
                "forced failure",
            )))
        })
        .await;

    assert!(matches!(result, Err(LifecycleStoreError::Persistence(_))));
    assert_eq!(store.task_count().expect("count"), 0);
    assert_eq!(store.transition_count().expect("count"), 0);
    assert_eq!(store.service_record_count().expect("count"), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn committed_work_is_visible_to_reads(store: InMemoryLifecycleStore) {
    let pending = task("abc-1");
    let task_id = pending.id();
    let reference = store
        .in_transaction(move |tx| {
            let at = pending.created_at();
            let reference = persist_service(&http_spec(), tx, at)?;
            tx.insert_task(&pending)?;
            tx.append_transition(&NewTransition::new(
                pending.id(),
                pending.state(),
                Some(reference),
                at,
            ))?;
            Ok(reference)
        })
        .await
        .expect("transaction should commit");

    let identifier = TaskIdentifier::new("abc-1").expect("valid identifier");
    let found = store
        .find_by_identifier(&identifier)
        .await
        .expect("lookup")
        .expect("task exists");
    let history = store.history(task_id).await.expect("history");

    assert_eq!(found.id(), task_id);
    assert_eq!(reference.kind(), ServiceKind::Http);
    assert_eq!(history.len(), 1);
    assert_eq!(
        history.first().and_then(|entry| entry.service_ref()),
        Some(reference)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn append_for_missing_task_is_not_found(store: InMemoryLifecycleStore) {
    let missing = TaskId::new();
    let result = store
        .in_transaction(move |tx| {
            tx.append_transition(&NewTransition::new(
                missing,
                TaskState::Processing,
                None,
                DefaultClock.utc(),
            ))
        })
        .await;

    assert!(matches!(result, Err(LifecycleStoreError::TaskNotFound(id)) if id == missing));
    assert_eq!(store.transition_count().expect("count"), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_missing_task_is_not_found(store: InMemoryLifecycleStore) {
    let missing = task("ghost");
    let missing_id = missing.id();
    let result = store.in_transaction(move |tx| tx.update_task(&missing)).await;

    assert!(matches!(result, Err(LifecycleStoreError::TaskNotFound(id)) if id == missing_id));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_identifier_is_rejected_by_store(store: InMemoryLifecycleStore) {
    let first = task("abc-1");
    store
        .in_transaction(move |tx| tx.insert_task(&first))
        .await
        .expect("first insert should commit");

    let second = task("abc-1");
    let result = store.in_transaction(move |tx| tx.insert_task(&second)).await;

    assert!(matches!(
        result,
        Err(LifecycleStoreError::DuplicateIdentifier(ref identifier)) if identifier.as_str() == "abc-1"
    ));
    assert_eq!(store.task_count().expect("count"), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dangling_reference_resolves_to_nothing(store: InMemoryLifecycleStore) {
    let dangling = ServiceRef::new(ServiceKind::Http, ServiceRecordId::new(404));
    let resolved = resolve_service(&store, dangling).await.expect("lookup");

    assert!(resolved.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transaction_reads_its_own_staged_writes(store: InMemoryLifecycleStore) {
    let mut pending = task("abc-1");
    let task_id = pending.id();
    let entry = store
        .in_transaction(move |tx| {
            tx.insert_task(&pending)?;
            pending.change_state(TaskState::Processing, &DefaultClock);
            tx.update_task(&pending)?;
            let duplicate = tx.insert_task(&pending);
            assert!(matches!(duplicate, Err(LifecycleStoreError::DuplicateTask(_))));
            tx.append_transition(&NewTransition::new(
                pending.id(),
                pending.state(),
                None,
                pending.modified_at(),
            ))
        })
        .await
        .expect("staged task should accept updates and entries");

    let identifier = TaskIdentifier::new("abc-1").expect("valid identifier");
    let stored = store
        .find_by_identifier(&identifier)
        .await
        .expect("lookup")
        .expect("task should be committed");
    assert_eq!(stored.state(), TaskState::Processing);
    assert_eq!(entry.task_id(), task_id);
    assert_eq!(store.transition_count().expect("count"), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rolled_back_update_keeps_committed_task_and_sequence(store: InMemoryLifecycleStore) {
    let created = task("abc-1");
    let first = store
        .in_transaction({
            let created = created.clone();
            move |tx| {
                tx.insert_task(&created)?;
                tx.append_transition(&NewTransition::new(
                    created.id(),
                    created.state(),
                    None,
                    created.created_at(),
                ))
            }
        })
        .await
        .expect("create should commit");

    let mut changed = created.clone();
    changed.change_state(TaskState::Fail, &DefaultClock);
    let result: Result<(), _> = store
        .in_transaction(move |tx| {
            tx.update_task(&changed)?;
            tx.append_transition(&NewTransition::new(
                changed.id(),
                changed.state(),
                None,
                changed.modified_at(),
            ))?;
            Err(LifecycleStoreError::persistence(std::io::Error::other(
                "forced failure",
            )))
        })
        .await;
    assert!(result.is_err());

    let identifier = TaskIdentifier::new("abc-1").expect("valid identifier");
    let stored = store
        .find_by_identifier(&identifier)
        .await
        .expect("lookup")
        .expect("task should still exist");
    assert_eq!(stored, created);

    let task_id = created.id();
    let second = store
        .in_transaction(move |tx| {
            tx.append_transition(&NewTransition::new(
                task_id,
                TaskState::Complete,
                None,
                DefaultClock.utc(),
            ))
        })
        .await
        .expect("append should commit");
    assert_eq!(second.id().value(), first.id().value() + 1);
    let history = store.history(task_id).await.expect("history");
    assert_eq!(history, vec![second, first]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn batched_record_lookup_skips_missing_ids(store: InMemoryLifecycleStore) {
    let pending = task("abc-1");
    let reference = store
        .in_transaction(move |tx| {
            let at = pending.created_at();
            let reference = persist_service(&http_spec(), tx, at)?;
            tx.insert_task(&pending)?;
            Ok(reference)
        })
        .await
        .expect("commit");

    let found = store
        .find_http_records(&[reference.id(), ServiceRecordId::new(404)])
        .await
        .expect("lookup");

    assert_eq!(found.len(), 1);
    assert_eq!(found.first().map(HttpServiceRecord::id), Some(reference.id()));
}
