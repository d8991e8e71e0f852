//! Diesel row models for task lifecycle persistence.

use super::schema::{http_services, task_transitions, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Task name.
    pub name: String,
    /// External identifier.
    pub identifier: String,
    /// Lifecycle state.
    pub state: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last state change timestamp.
    pub modified_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Task name.
    pub name: String,
    /// External identifier.
    pub identifier: String,
    /// Lifecycle state.
    pub state: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last state change timestamp.
    pub modified_at: DateTime<Utc>,
}

/// Query result row for HTTP service records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = http_services)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HttpServiceRow {
    /// Service record identifier.
    pub id: i64,
    /// Upstream URL.
    pub upstream_url: String,
    /// HTTP method.
    pub method: String,
    /// Request headers.
    pub headers: Option<Value>,
    /// Request payload.
    pub data_in: Option<Value>,
    /// Response payload.
    pub data_out: Option<Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for HTTP service records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = http_services)]
pub struct NewHttpServiceRow {
    /// Upstream URL.
    pub upstream_url: String,
    /// HTTP method.
    pub method: String,
    /// Request headers.
    pub headers: Option<Value>,
    /// Request payload.
    pub data_in: Option<Value>,
    /// Response payload.
    pub data_out: Option<Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Query result row for transition log entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_transitions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TransitionRow {
    /// Transition identifier.
    pub id: i64,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Referenced service kind.
    pub service_kind: Option<String>,
    /// Referenced service record identifier.
    pub service_id: Option<i64>,
    /// Recorded state.
    pub state: String,
    /// Append timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for transition log entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_transitions)]
pub struct NewTransitionRow {
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Referenced service kind.
    pub service_kind: Option<String>,
    /// Referenced service record identifier.
    pub service_id: Option<i64>,
    /// Recorded state.
    pub state: String,
    /// Append timestamp.
    pub created_at: DateTime<Utc>,
}
