//! Store port for tasks, their transition logs, and the service records
//! those logs reference.
//!
//! Writes happen only inside [`LifecycleStore::in_transaction`]: the work
//! closure receives a [`LifecycleTransaction`] scope, and every write made
//! through it is committed together or rolled back together.

use crate::service::ports::{ServiceRecordReader, ServiceRecordWriter, ServiceStoreError};
use crate::task::domain::{NewTransition, Task, TaskId, TaskIdentifier, TransitionLogEntry};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for lifecycle store operations.
pub type LifecycleStoreResult<T> = Result<T, LifecycleStoreError>;

/// Write scope of one storage transaction.
pub trait LifecycleTransaction: ServiceRecordWriter {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleStoreError::DuplicateIdentifier`] when another
    /// task already uses the identifier, or
    /// [`LifecycleStoreError::DuplicateTask`] when the task ID exists.
    fn insert_task(&mut self, task: &Task) -> LifecycleStoreResult<()>;

    /// Persists the state and modification time of an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleStoreError::TaskNotFound`] when the task does not
    /// exist.
    fn update_task(&mut self, task: &Task) -> LifecycleStoreResult<()>;

    /// Appends an entry to the task's transition log.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleStoreError::TaskNotFound`] when the owning task
    /// does not exist.
    fn append_transition(
        &mut self,
        transition: &NewTransition,
    ) -> LifecycleStoreResult<TransitionLogEntry>;
}

/// Task lifecycle persistence contract.
#[async_trait]
pub trait LifecycleStore: ServiceRecordReader + Send + Sync {
    /// Runs `work` inside one storage transaction.
    ///
    /// The transaction commits when `work` returns `Ok` and rolls back every
    /// write made through the scope when it returns `Err`; the error is
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `work`, or
    /// [`LifecycleStoreError::Persistence`] when the transaction cannot be
    /// opened or committed.
    async fn in_transaction<T, F>(&self, work: F) -> LifecycleStoreResult<T>
    where
        F: FnOnce(&mut dyn LifecycleTransaction) -> LifecycleStoreResult<T> + Send + 'static,
        T: Send + 'static;

    /// Finds a task by its external identifier.
    ///
    /// Returns `None` when no task uses the identifier.
    async fn find_by_identifier(
        &self,
        identifier: &TaskIdentifier,
    ) -> LifecycleStoreResult<Option<Task>>;

    /// Returns the task's transition log, most recent entry first.
    ///
    /// Returns an empty list when the task has no entries.
    async fn history(&self, task_id: TaskId) -> LifecycleStoreResult<Vec<TransitionLogEntry>>;
}

/// Errors returned by lifecycle store implementations.
#[derive(Debug, Clone, Error)]
pub enum LifecycleStoreError {
    /// A task with the same internal identifier already exists.
    #[error("duplicate task: {0}")]
    DuplicateTask(TaskId),

    /// A task with the same external identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateIdentifier(TaskIdentifier),

    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl LifecycleStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<ServiceStoreError> for LifecycleStoreError {
    fn from(err: ServiceStoreError) -> Self {
        match err {
            ServiceStoreError::Persistence(inner) => Self::Persistence(inner),
        }
    }
}
