//! Serializable response bodies.

use crate::service::domain::{HttpMethod, HttpServiceRecord, ServiceRecord, UpstreamUrl};
use crate::task::domain::{TaskIdentifier, TaskState, TransitionId, TransitionLogEntry};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Body of a current-state lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrentStateView {
    /// The task's current state.
    pub current_state: TaskState,
}

impl From<TaskState> for CurrentStateView {
    fn from(current_state: TaskState) -> Self {
        Self { current_state }
    }
}

/// One history entry with its service record resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionView {
    /// Transition log entry identifier.
    pub id: TransitionId,
    /// External identifier of the owning task.
    pub task_identifier: TaskIdentifier,
    /// Recorded service call, or `None` when the entry has none or its
    /// record no longer exists.
    pub service: Option<ServiceView>,
    /// State recorded by the transition.
    pub state: TaskState,
    /// Append timestamp.
    pub created_at: DateTime<Utc>,
}

impl TransitionView {
    /// Builds the view of `entry` owned by the task with `task_identifier`.
    #[must_use]
    pub fn new(
        entry: &TransitionLogEntry,
        task_identifier: TaskIdentifier,
        service: Option<ServiceRecord>,
    ) -> Self {
        Self {
            id: entry.id(),
            task_identifier,
            service: service.map(ServiceView::from),
            state: entry.state(),
            created_at: entry.created_at(),
        }
    }
}

/// Service record body, shaped per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ServiceView {
    /// HTTP call record.
    Http(HttpServiceView),
}

impl From<ServiceRecord> for ServiceView {
    fn from(record: ServiceRecord) -> Self {
        match record {
            ServiceRecord::Http(http) => Self::Http(HttpServiceView::from(http)),
        }
    }
}

/// Body of a recorded HTTP call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpServiceView {
    /// Upstream URL.
    pub upstream_url: UpstreamUrl,
    /// HTTP method.
    pub method: HttpMethod,
    /// Request headers.
    pub headers: Option<Value>,
    /// Request payload.
    #[serde(rename = "dataIn")]
    pub data_in: Option<Value>,
    /// Response payload.
    #[serde(rename = "dataOut")]
    pub data_out: Option<Value>,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<HttpServiceRecord> for HttpServiceView {
    fn from(record: HttpServiceRecord) -> Self {
        let spec = record.spec();
        Self {
            upstream_url: spec.upstream_url().clone(),
            method: spec.method(),
            headers: spec.headers().cloned(),
            data_in: spec.data_in().cloned(),
            data_out: spec.data_out().cloned(),
            created_at: record.created_at(),
        }
    }
}
