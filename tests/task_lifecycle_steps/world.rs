//! Shared world state for task lifecycle BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use stateward::{
    config::LifecycleConfig,
    task::{
        adapters::memory::InMemoryLifecycleStore,
        services::{TaskLifecycleError, TaskLifecycleService},
    },
};

/// Service type used by the BDD world.
pub type TestLifecycleService = TaskLifecycleService<InMemoryLifecycleStore, DefaultClock>;

/// Scenario world for task lifecycle behaviour tests.
pub struct LifecycleWorld {
    pub service: TestLifecycleService,
    pub last_result: Option<Result<(), TaskLifecycleError>>,
}

impl LifecycleWorld {
    /// Creates a world over an empty store.
    #[must_use]
    pub fn new() -> Self {
        let service = TaskLifecycleService::new(
            Arc::new(InMemoryLifecycleStore::new()),
            Arc::new(DefaultClock),
            Arc::new(LifecycleConfig::default()),
        );

        Self {
            service,
            last_result: None,
        }
    }

    /// Keeps the outcome of the latest operation for later assertions.
    pub fn record<T>(&mut self, result: Result<T, TaskLifecycleError>) {
        self.last_result = Some(result.map(|_| ()));
    }
}

impl Default for LifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> LifecycleWorld {
    LifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
