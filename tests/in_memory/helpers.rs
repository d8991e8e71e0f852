//! Shared test helpers for in-memory store integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use serde_json::{Value, json};
use stateward::{
    config::{LifecycleConfig, LoggingConfig},
    logging,
    task::{adapters::memory::InMemoryLifecycleStore, services::TaskLifecycleService},
};

/// Coordinator type used by the in-memory tests.
pub type TestService = TaskLifecycleService<InMemoryLifecycleStore, DefaultClock>;

/// Coordinator together with a handle to its store for inspection.
pub struct Harness {
    pub store: InMemoryLifecycleStore,
    pub service: Arc<TestService>,
}

/// Provides a coordinator over a fresh store with the default settings.
#[fixture]
pub fn harness() -> Harness {
    logging::init(&LoggingConfig {
        filter: "warn".to_owned(),
        json: false,
    });
    let store = InMemoryLifecycleStore::new();
    let service = TaskLifecycleService::new(
        Arc::new(store.clone()),
        Arc::new(DefaultClock),
        Arc::new(LifecycleConfig::default()),
    );
    Harness {
        store,
        service: Arc::new(service),
    }
}

/// Builds an HTTP `service` member for the given URL.
#[must_use]
pub fn http_service(upstream_url: &str) -> Value {
    json!({"type": "http", "upstream_url": upstream_url})
}

/// Returns `(tasks, transitions, service records)` held by the store.
///
/// # Errors
///
/// Returns an error if a store lock is poisoned.
pub fn store_counts(store: &InMemoryLifecycleStore) -> Result<(usize, usize, usize), eyre::Report> {
    Ok((
        store.task_count()?,
        store.transition_count()?,
        store.service_record_count()?,
    ))
}
