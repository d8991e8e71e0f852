//! In-memory lifecycle store for tests and embedding.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::service::{
    domain::{HttpServiceRecord, HttpServiceSpec, ServiceRecordId},
    ports::{ServiceRecordReader, ServiceRecordWriter, ServiceStoreError, ServiceStoreResult},
};
use crate::task::{
    domain::{NewTransition, Task, TaskId, TaskIdentifier, TransitionId, TransitionLogEntry},
    ports::{LifecycleStore, LifecycleStoreError, LifecycleStoreResult, LifecycleTransaction},
};

/// Thread-safe in-memory lifecycle store.
///
/// A transaction collects its writes beside the committed state and
/// applies them only when the work succeeds, so a write costs what it
/// touches rather than the size of the store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLifecycleStore {
    state: Arc<RwLock<InMemoryLifecycleState>>,
}

#[derive(Debug, Default)]
struct InMemoryLifecycleState {
    tasks: HashMap<TaskId, Task>,
    identifier_index: HashMap<TaskIdentifier, TaskId>,
    transitions: BTreeMap<TransitionId, TransitionLogEntry>,
    http_records: BTreeMap<ServiceRecordId, HttpServiceRecord>,
    last_transition_id: i64,
    last_service_record_id: i64,
}

impl InMemoryLifecycleStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored tasks.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleStoreError::Persistence`] when the lock is poisoned.
    pub fn task_count(&self) -> LifecycleStoreResult<usize> {
        Ok(self.read()?.tasks.len())
    }

    /// Returns the number of transition log entries across all tasks.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleStoreError::Persistence`] when the lock is poisoned.
    pub fn transition_count(&self) -> LifecycleStoreResult<usize> {
        Ok(self.read()?.transitions.len())
    }

    /// Returns the number of stored service records across all kinds.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleStoreError::Persistence`] when the lock is poisoned.
    pub fn service_record_count(&self) -> LifecycleStoreResult<usize> {
        Ok(self.read()?.http_records.len())
    }

    fn read(
        &self,
    ) -> LifecycleStoreResult<std::sync::RwLockReadGuard<'_, InMemoryLifecycleState>> {
        self.state.read().map_err(|err| {
            LifecycleStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

/// Next value of a monotonically increasing store sequence.
fn next_id(last: &mut i64) -> Result<i64, std::io::Error> {
    let next = last
        .checked_add(1)
        .ok_or_else(|| std::io::Error::other("identifier sequence exhausted"))?;
    *last = next;
    Ok(next)
}

/// Rows written by one transaction, applied to the committed state only
/// when the work succeeds.
#[derive(Debug, Default)]
struct StagedWrites {
    tasks: HashMap<TaskId, Task>,
    identifiers: HashMap<TaskIdentifier, TaskId>,
    transitions: Vec<TransitionLogEntry>,
    http_records: Vec<HttpServiceRecord>,
    last_transition_id: i64,
    last_service_record_id: i64,
}

/// Write scope reading through to the committed state.
struct StagedTransaction<'state> {
    committed: &'state InMemoryLifecycleState,
    writes: StagedWrites,
}

impl<'state> StagedTransaction<'state> {
    fn new(committed: &'state InMemoryLifecycleState) -> Self {
        Self {
            committed,
            writes: StagedWrites {
                last_transition_id: committed.last_transition_id,
                last_service_record_id: committed.last_service_record_id,
                ..StagedWrites::default()
            },
        }
    }

    fn task_exists(&self, task_id: &TaskId) -> bool {
        self.writes.tasks.contains_key(task_id) || self.committed.tasks.contains_key(task_id)
    }

    fn identifier_taken(&self, identifier: &TaskIdentifier) -> bool {
        self.writes.identifiers.contains_key(identifier)
            || self.committed.identifier_index.contains_key(identifier)
    }

    fn into_writes(self) -> StagedWrites {
        self.writes
    }
}

impl InMemoryLifecycleState {
    fn apply(&mut self, writes: StagedWrites) {
        self.tasks.extend(writes.tasks);
        self.identifier_index.extend(writes.identifiers);
        self.transitions
            .extend(writes.transitions.into_iter().map(|entry| (entry.id(), entry)));
        self.http_records.extend(
            writes
                .http_records
                .into_iter()
                .map(|record| (record.id(), record)),
        );
        self.last_transition_id = writes.last_transition_id;
        self.last_service_record_id = writes.last_service_record_id;
    }
}

impl ServiceRecordWriter for StagedTransaction<'_> {
    fn insert_http_record(
        &mut self,
        spec: &HttpServiceSpec,
        created_at: DateTime<Utc>,
    ) -> ServiceStoreResult<ServiceRecordId> {
        let id = ServiceRecordId::new(
            next_id(&mut self.writes.last_service_record_id)
                .map_err(ServiceStoreError::persistence)?,
        );
        self.writes
            .http_records
            .push(HttpServiceRecord::from_spec(id, spec.clone(), created_at));
        Ok(id)
    }
}

impl LifecycleTransaction for StagedTransaction<'_> {
    fn insert_task(&mut self, task: &Task) -> LifecycleStoreResult<()> {
        if self.task_exists(&task.id()) {
            return Err(LifecycleStoreError::DuplicateTask(task.id()));
        }

        let identifier = task.identifier().clone();
        if self.identifier_taken(&identifier) {
            return Err(LifecycleStoreError::DuplicateIdentifier(identifier));
        }

        self.writes.identifiers.insert(identifier, task.id());
        self.writes.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    fn update_task(&mut self, task: &Task) -> LifecycleStoreResult<()> {
        if !self.task_exists(&task.id()) {
            return Err(LifecycleStoreError::TaskNotFound(task.id()));
        }
        self.writes.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    fn append_transition(
        &mut self,
        transition: &NewTransition,
    ) -> LifecycleStoreResult<TransitionLogEntry> {
        if !self.task_exists(&transition.task_id()) {
            return Err(LifecycleStoreError::TaskNotFound(transition.task_id()));
        }
        let id = TransitionId::new(
            next_id(&mut self.writes.last_transition_id)
                .map_err(LifecycleStoreError::persistence)?,
        );
        let entry = transition.into_entry(id);
        self.writes.transitions.push(entry);
        Ok(entry)
    }
}

#[async_trait]
impl ServiceRecordReader for InMemoryLifecycleStore {
    async fn find_http_record(
        &self,
        id: ServiceRecordId,
    ) -> ServiceStoreResult<Option<HttpServiceRecord>> {
        let state = self.state.read().map_err(|err| {
            ServiceStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.http_records.get(&id).cloned())
    }

    async fn find_http_records(
        &self,
        ids: &[ServiceRecordId],
    ) -> ServiceStoreResult<Vec<HttpServiceRecord>> {
        let state = self.state.read().map_err(|err| {
            ServiceStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(ids
            .iter()
            .filter_map(|id| state.http_records.get(id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LifecycleStore for InMemoryLifecycleStore {
    async fn in_transaction<T, F>(&self, work: F) -> LifecycleStoreResult<T>
    where
        F: FnOnce(&mut dyn LifecycleTransaction) -> LifecycleStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let mut state = self.state.write().map_err(|err| {
            LifecycleStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut staged = StagedTransaction::new(&state);
        let output = work(&mut staged)?;
        let writes = staged.into_writes();
        state.apply(writes);
        Ok(output)
    }

    async fn find_by_identifier(
        &self,
        identifier: &TaskIdentifier,
    ) -> LifecycleStoreResult<Option<Task>> {
        let state = self.read()?;
        let task = state
            .identifier_index
            .get(identifier)
            .and_then(|task_id| state.tasks.get(task_id))
            .cloned();
        Ok(task)
    }

    async fn history(&self, task_id: TaskId) -> LifecycleStoreResult<Vec<TransitionLogEntry>> {
        let state = self.read()?;
        Ok(state
            .transitions
            .values()
            .rev()
            .filter(|entry| entry.task_id() == task_id)
            .copied()
            .collect())
    }
}
