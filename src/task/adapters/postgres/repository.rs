//! `PostgreSQL` store implementation for task lifecycle storage.

use super::{
    models::{HttpServiceRow, NewHttpServiceRow, NewTaskRow, NewTransitionRow, TaskRow, TransitionRow},
    schema::{http_services, task_transitions, tasks},
};
use crate::config::DatabaseConfig;
use crate::service::{
    domain::{
        HttpMethod, HttpServiceRecord, HttpServiceSpec, PersistedHttpServiceData, ServiceKind,
        ServiceRecordId, ServiceRef, UpstreamUrl,
    },
    ports::{ServiceRecordReader, ServiceRecordWriter, ServiceStoreError, ServiceStoreResult},
};
use crate::task::{
    domain::{
        NewTransition, PersistedTaskData, Task, TaskId, TaskIdentifier, TaskName, TaskState,
        TransitionId, TransitionLogEntry,
    },
    ports::{LifecycleStore, LifecycleStoreError, LifecycleStoreResult, LifecycleTransaction},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by lifecycle adapters.
pub type LifecyclePgPool = Pool<ConnectionManager<PgConnection>>;

/// Unique constraint guarding task identifiers.
const IDENTIFIER_UNIQUE_CONSTRAINT: &str = "tasks_identifier_unique";

/// `PostgreSQL`-backed lifecycle store.
#[derive(Debug, Clone)]
pub struct PostgresLifecycleStore {
    pool: LifecyclePgPool,
}

impl PostgresLifecycleStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: LifecyclePgPool) -> Self {
        Self { pool }
    }

    /// Builds a connection pool from configuration and wraps it in a store.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleStoreError::Persistence`] when the pool cannot be
    /// built.
    pub fn connect(config: &DatabaseConfig) -> LifecycleStoreResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(config.url.as_str());
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .build(manager)
            .map_err(LifecycleStoreError::persistence)?;
        tracing::debug!(max_connections = config.max_connections, "lifecycle store pool ready");
        Ok(Self::new(pool))
    }

    async fn run_blocking<F, T>(&self, operation: F) -> LifecycleStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> LifecycleStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(LifecycleStoreError::persistence)?;
            operation(&mut connection)
        })
        .await
        .map_err(LifecycleStoreError::persistence)?
    }
}

impl From<DieselError> for LifecycleStoreError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// Write scope bound to one open database transaction.
struct PgLifecycleTransaction<'conn> {
    connection: &'conn mut PgConnection,
}

impl ServiceRecordWriter for PgLifecycleTransaction<'_> {
    fn insert_http_record(
        &mut self,
        spec: &HttpServiceSpec,
        created_at: DateTime<Utc>,
    ) -> ServiceStoreResult<ServiceRecordId> {
        insert_http_service(self.connection, spec, created_at)
    }
}

impl LifecycleTransaction for PgLifecycleTransaction<'_> {
    fn insert_task(&mut self, task: &Task) -> LifecycleStoreResult<()> {
        insert_task_row(self.connection, task)
    }

    fn update_task(&mut self, task: &Task) -> LifecycleStoreResult<()> {
        update_task_row(self.connection, task)
    }

    fn append_transition(
        &mut self,
        transition: &NewTransition,
    ) -> LifecycleStoreResult<TransitionLogEntry> {
        insert_transition_row(self.connection, transition)
    }
}

#[async_trait]
impl ServiceRecordReader for PostgresLifecycleStore {
    async fn find_http_record(
        &self,
        id: ServiceRecordId,
    ) -> ServiceStoreResult<Option<HttpServiceRecord>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ServiceStoreError::persistence)?;
            let row = http_services::table
                .filter(http_services::id.eq(id.value()))
                .select(HttpServiceRow::as_select())
                .first::<HttpServiceRow>(&mut connection)
                .optional()
                .map_err(ServiceStoreError::persistence)?;
            row.map(row_to_http_record).transpose()
        })
        .await
        .map_err(ServiceStoreError::persistence)?
    }

    async fn find_http_records(
        &self,
        ids: &[ServiceRecordId],
    ) -> ServiceStoreResult<Vec<HttpServiceRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw_ids: Vec<i64> = ids.iter().map(|id| id.value()).collect();
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ServiceStoreError::persistence)?;
            let rows = http_services::table
                .filter(http_services::id.eq_any(raw_ids))
                .select(HttpServiceRow::as_select())
                .load::<HttpServiceRow>(&mut connection)
                .map_err(ServiceStoreError::persistence)?;
            rows.into_iter().map(row_to_http_record).collect()
        })
        .await
        .map_err(ServiceStoreError::persistence)?
    }
}

#[async_trait]
impl LifecycleStore for PostgresLifecycleStore {
    async fn in_transaction<T, F>(&self, work: F) -> LifecycleStoreResult<T>
    where
        F: FnOnce(&mut dyn LifecycleTransaction) -> LifecycleStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        self.run_blocking(move |connection| {
            connection.transaction::<T, LifecycleStoreError, _>(|tx_connection| {
                let mut scope = PgLifecycleTransaction {
                    connection: tx_connection,
                };
                work(&mut scope)
            })
        })
        .await
    }

    async fn find_by_identifier(
        &self,
        identifier: &TaskIdentifier,
    ) -> LifecycleStoreResult<Option<Task>> {
        let lookup = identifier.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::identifier.eq(&lookup))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(LifecycleStoreError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn history(&self, task_id: TaskId) -> LifecycleStoreResult<Vec<TransitionLogEntry>> {
        self.run_blocking(move |connection| {
            let rows = task_transitions::table
                .filter(task_transitions::task_id.eq(task_id.into_inner()))
                .order(task_transitions::id.desc())
                .select(TransitionRow::as_select())
                .load::<TransitionRow>(connection)
                .map_err(LifecycleStoreError::persistence)?;
            rows.into_iter().map(row_to_transition).collect()
        })
        .await
    }
}

fn insert_http_service(
    connection: &mut PgConnection,
    spec: &HttpServiceSpec,
    created_at: DateTime<Utc>,
) -> ServiceStoreResult<ServiceRecordId> {
    let new_row = NewHttpServiceRow {
        upstream_url: spec.upstream_url().as_str().to_owned(),
        method: spec.method().as_str().to_owned(),
        headers: spec.headers().cloned(),
        data_in: spec.data_in().cloned(),
        data_out: spec.data_out().cloned(),
        created_at,
    };
    let id = diesel::insert_into(http_services::table)
        .values(&new_row)
        .returning(http_services::id)
        .get_result::<i64>(connection)
        .map_err(ServiceStoreError::persistence)?;
    Ok(ServiceRecordId::new(id))
}

fn insert_task_row(connection: &mut PgConnection, task: &Task) -> LifecycleStoreResult<()> {
    let task_id = task.id();
    let identifier = task.identifier().clone();

    // Concurrent creates that pass this check are caught by the unique
    // constraint below.
    let existing: i64 = tasks::table
        .filter(tasks::identifier.eq(identifier.as_str()))
        .count()
        .get_result(connection)
        .map_err(LifecycleStoreError::persistence)?;
    if existing > 0 {
        return Err(LifecycleStoreError::DuplicateIdentifier(identifier));
    }

    diesel::insert_into(tasks::table)
        .values(&to_new_task_row(task))
        .execute(connection)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                if is_identifier_unique_violation(info.as_ref()) =>
            {
                LifecycleStoreError::DuplicateIdentifier(identifier.clone())
            }
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                LifecycleStoreError::DuplicateTask(task_id)
            }
            _ => LifecycleStoreError::persistence(err),
        })?;
    Ok(())
}

fn update_task_row(connection: &mut PgConnection, task: &Task) -> LifecycleStoreResult<()> {
    let updated_count = diesel::update(tasks::table.filter(tasks::id.eq(task.id().into_inner())))
        .set((
            tasks::state.eq(task.state().as_str()),
            tasks::modified_at.eq(task.modified_at()),
        ))
        .execute(connection)
        .map_err(LifecycleStoreError::persistence)?;

    if updated_count == 0 {
        return Err(LifecycleStoreError::TaskNotFound(task.id()));
    }
    Ok(())
}

fn insert_transition_row(
    connection: &mut PgConnection,
    transition: &NewTransition,
) -> LifecycleStoreResult<TransitionLogEntry> {
    let task_id = transition.task_id();
    let service_ref = transition.service_ref();
    let new_row = NewTransitionRow {
        task_id: task_id.into_inner(),
        service_kind: service_ref.map(|reference| reference.kind().as_str().to_owned()),
        service_id: service_ref.map(|reference| reference.id().value()),
        state: transition.state().as_str().to_owned(),
        created_at: transition.created_at(),
    };

    let id = diesel::insert_into(task_transitions::table)
        .values(&new_row)
        .returning(task_transitions::id)
        .get_result::<i64>(connection)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                LifecycleStoreError::TaskNotFound(task_id)
            }
            _ => LifecycleStoreError::persistence(err),
        })?;
    Ok(transition.into_entry(TransitionId::new(id)))
}

fn to_new_task_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        name: task.name().as_str().to_owned(),
        identifier: task.identifier().as_str().to_owned(),
        state: task.state().as_str().to_owned(),
        created_at: task.created_at(),
        modified_at: task.modified_at(),
    }
}

fn row_to_task(row: TaskRow) -> LifecycleStoreResult<Task> {
    let TaskRow {
        id,
        name,
        identifier,
        state,
        created_at,
        modified_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        name: TaskName::new(name).map_err(LifecycleStoreError::persistence)?,
        identifier: TaskIdentifier::new(identifier).map_err(LifecycleStoreError::persistence)?,
        state: TaskState::try_from(state.as_str()).map_err(LifecycleStoreError::persistence)?,
        created_at,
        modified_at,
    };
    Ok(Task::from_persisted(data))
}

fn row_to_transition(row: TransitionRow) -> LifecycleStoreResult<TransitionLogEntry> {
    let state =
        TaskState::try_from(row.state.as_str()).map_err(LifecycleStoreError::persistence)?;
    let service_ref = match (row.service_kind, row.service_id) {
        (Some(kind), Some(service_id)) => Some(ServiceRef::new(
            ServiceKind::try_from(kind.as_str()).map_err(LifecycleStoreError::persistence)?,
            ServiceRecordId::new(service_id),
        )),
        _ => None,
    };

    let transition =
        NewTransition::new(TaskId::from_uuid(row.task_id), state, service_ref, row.created_at);
    Ok(transition.into_entry(TransitionId::new(row.id)))
}

fn row_to_http_record(row: HttpServiceRow) -> ServiceStoreResult<HttpServiceRecord> {
    let data = PersistedHttpServiceData {
        id: ServiceRecordId::new(row.id),
        upstream_url: UpstreamUrl::new(row.upstream_url).map_err(ServiceStoreError::persistence)?,
        method: HttpMethod::try_from(row.method.as_str()).map_err(ServiceStoreError::persistence)?,
        headers: row.headers,
        data_in: row.data_in,
        data_out: row.data_out,
        created_at: row.created_at,
    };
    Ok(HttpServiceRecord::from_persisted(data))
}

fn is_identifier_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == IDENTIFIER_UNIQUE_CONSTRAINT)
}
