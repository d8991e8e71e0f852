//! Coordinator for task creation, state changes, and history reads.
//!
//! Every write operation runs its writes inside a single store transaction:
//! the service record (when supplied), the task row, and the transition log
//! entry are committed together or not at all.

use super::{
    ChangeStateRequest, CreateTaskRequest, RequestValidationError, TransitionView,
    validate_service_spec,
};
use crate::config::LifecycleConfig;
use crate::service::{
    domain::{ServiceDomainError, ServiceRecord, ServiceRef, ServiceSpec},
    services::{persist_service, resolve_services},
};
use crate::task::{
    domain::{
        NewTransition, ParseTaskStateError, Task, TaskDomainError, TaskIdentifier, TaskName,
        TaskState, TransitionLogEntry,
    },
    ports::{LifecycleStore, LifecycleStoreError, LifecycleTransaction},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// The request body is malformed.
    #[error(transparent)]
    Request(#[from] RequestValidationError),

    /// Task field validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The requested state is not one of the lifecycle states.
    #[error(transparent)]
    InvalidState(#[from] ParseTaskStateError),

    /// Service payload validation failed.
    #[error(transparent)]
    Service(#[from] ServiceDomainError),

    /// The service `type` is missing or not enabled.
    #[error("unknown service requested")]
    UnknownService(Option<String>),

    /// The service `type` is enabled but has no record implementation.
    #[error("service type '{0}' is not supported")]
    UnsupportedService(String),

    /// Another task already uses the identifier.
    #[error("task identifier already exists: {0}")]
    Conflict(TaskIdentifier),

    /// No task uses the identifier.
    #[error("task not found: {0}")]
    NotFound(String),

    /// Store operation failed.
    #[error(transparent)]
    Store(LifecycleStoreError),
}

impl TaskLifecycleError {
    /// Returns the HTTP status code reported for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Request(_) | Self::Domain(_) | Self::InvalidState(_) | Self::Service(_) => 400,
            Self::NotFound(_) | Self::Store(LifecycleStoreError::TaskNotFound(_)) => 404,
            Self::UnknownService(_) | Self::UnsupportedService(_) => 406,
            Self::Conflict(_)
            | Self::Store(
                LifecycleStoreError::DuplicateIdentifier(_) | LifecycleStoreError::DuplicateTask(_),
            ) => 409,
            Self::Store(LifecycleStoreError::Persistence(_)) => 500,
        }
    }
}

impl From<LifecycleStoreError> for TaskLifecycleError {
    fn from(err: LifecycleStoreError) -> Self {
        match err {
            LifecycleStoreError::DuplicateIdentifier(identifier) => Self::Conflict(identifier),
            other => Self::Store(other),
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<S, C>
where
    S: LifecycleStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    config: Arc<LifecycleConfig>,
}

impl<S, C> TaskLifecycleService<S, C>
where
    S: LifecycleStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>, config: Arc<LifecycleConfig>) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Creates a task and records its initial state.
    ///
    /// The service payload is checked before the task fields.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid service payload, name,
    /// identifier, or state, [`TaskLifecycleError::Conflict`] when the
    /// identifier is taken, and [`TaskLifecycleError::Store`] when
    /// persistence fails. No writes survive a failure.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let (service, name, identifier, state) = Self::validate_create(&request, &self.config)
            .inspect_err(|err| debug!(error = %err, "rejected task creation"))?;

        let task = Task::new(name, identifier, state, &*self.clock);
        let stored = task.clone();
        let service_ref = self
            .store
            .in_transaction(move |tx| {
                let created_at = stored.created_at();
                let service_ref = persist_optional(service.as_ref(), tx, created_at)?;
                tx.insert_task(&stored)?;
                tx.append_transition(&NewTransition::new(
                    stored.id(),
                    stored.state(),
                    service_ref,
                    created_at,
                ))?;
                Ok(service_ref)
            })
            .await?;

        info!(
            task_id = %task.id(),
            task_identifier = %task.identifier(),
            state = %task.state(),
            service = ?service_ref.map(|reference| reference.to_string()),
            "task created"
        );
        Ok(task)
    }

    /// Moves a task to `request.state` and records the transition.
    ///
    /// Any state may follow any other.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown identifier, a
    /// validation error for an invalid state or service payload, and
    /// [`TaskLifecycleError::Store`] when persistence fails. No writes
    /// survive a failure.
    pub async fn change_state(
        &self,
        identifier: &str,
        request: ChangeStateRequest,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.require_task(identifier).await?;
        let (new_state, service) = Self::validate_change(&request, &self.config)
            .inspect_err(|err| debug!(error = %err, identifier, "rejected state change"))?;

        let previous_state = task.state();
        task.change_state(new_state, &*self.clock);
        let stored = task.clone();
        let service_ref = self
            .store
            .in_transaction(move |tx| {
                let modified_at = stored.modified_at();
                let service_ref = persist_optional(service.as_ref(), tx, modified_at)?;
                tx.update_task(&stored)?;
                tx.append_transition(&NewTransition::new(
                    stored.id(),
                    stored.state(),
                    service_ref,
                    modified_at,
                ))?;
                Ok(service_ref)
            })
            .await?;

        info!(
            task_id = %task.id(),
            task_identifier = %task.identifier(),
            from = %previous_state,
            to = %new_state,
            service = ?service_ref.map(|reference| reference.to_string()),
            "task state changed"
        );
        Ok(task)
    }

    /// Returns the current state of the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown identifier
    /// and [`TaskLifecycleError::Store`] when the lookup fails.
    pub async fn current_state(&self, identifier: &str) -> TaskLifecycleResult<TaskState> {
        Ok(self.require_task(identifier).await?.state())
    }

    /// Returns the full task record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown identifier
    /// and [`TaskLifecycleError::Store`] when the lookup fails.
    pub async fn find_task(&self, identifier: &str) -> TaskLifecycleResult<Task> {
        self.require_task(identifier).await
    }

    /// Returns the task's transitions, most recent first, with service
    /// records resolved.
    ///
    /// A reference to a missing service record resolves to no service.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown identifier
    /// and [`TaskLifecycleError::Store`] when a read fails.
    pub async fn history(&self, identifier: &str) -> TaskLifecycleResult<Vec<TransitionView>> {
        let task = self.require_task(identifier).await?;
        let entries = self.store.history(task.id()).await?;

        let references: Vec<ServiceRef> = entries
            .iter()
            .filter_map(TransitionLogEntry::service_ref)
            .collect();
        let records: HashMap<ServiceRef, ServiceRecord> =
            resolve_services(&*self.store, &references)
                .await
                .map_err(LifecycleStoreError::from)?
                .into_iter()
                .map(|record| (record.service_ref(), record))
                .collect();

        Ok(entries
            .iter()
            .map(|entry| {
                let service = entry
                    .service_ref()
                    .and_then(|service_ref| Self::lookup(&records, service_ref));
                TransitionView::new(entry, task.identifier().clone(), service)
            })
            .collect())
    }

    async fn require_task(&self, identifier: &str) -> TaskLifecycleResult<Task> {
        let not_found = || TaskLifecycleError::NotFound(identifier.to_owned());
        let parsed = TaskIdentifier::new(identifier).map_err(|_| not_found())?;
        self.store
            .find_by_identifier(&parsed)
            .await?
            .ok_or_else(not_found)
    }

    fn lookup(
        records: &HashMap<ServiceRef, ServiceRecord>,
        service_ref: ServiceRef,
    ) -> Option<ServiceRecord> {
        let record = records.get(&service_ref).cloned();
        if record.is_none() {
            warn!(service = %service_ref, "transition references a missing service record");
        }
        record
    }

    fn validate_create(
        request: &CreateTaskRequest,
        config: &LifecycleConfig,
    ) -> TaskLifecycleResult<(Option<ServiceSpec>, TaskName, TaskIdentifier, TaskState)> {
        let service = validate_service_spec(request.service(), config)?;
        let name = TaskName::new(request.name())?;
        let identifier = TaskIdentifier::new(request.identifier())?;
        let state = TaskState::try_from(request.state())?;
        Ok((service, name, identifier, state))
    }

    fn validate_change(
        request: &ChangeStateRequest,
        config: &LifecycleConfig,
    ) -> TaskLifecycleResult<(TaskState, Option<ServiceSpec>)> {
        let state = TaskState::try_from(request.state())?;
        let service = validate_service_spec(request.service(), config)?;
        Ok((state, service))
    }
}

/// Persists the service payload, if any, inside the open transaction.
fn persist_optional(
    service: Option<&ServiceSpec>,
    tx: &mut dyn LifecycleTransaction,
    created_at: DateTime<Utc>,
) -> Result<Option<ServiceRef>, LifecycleStoreError> {
    service
        .map(|spec| persist_service(spec, tx, created_at))
        .transpose()
        .map_err(LifecycleStoreError::from)
}
