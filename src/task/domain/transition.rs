//! Append-only transition log entries.

use super::{TaskId, TaskState, TransitionId};
use crate::service::domain::ServiceRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transition waiting to be appended to a task's log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTransition {
    task_id: TaskId,
    state: TaskState,
    service_ref: Option<ServiceRef>,
    created_at: DateTime<Utc>,
}

impl NewTransition {
    /// Describes a transition of `task_id` to `state`.
    #[must_use]
    pub const fn new(
        task_id: TaskId,
        state: TaskState,
        service_ref: Option<ServiceRef>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            task_id,
            state,
            service_ref,
            created_at,
        }
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the recorded state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns the service reference, if a service was invoked.
    #[must_use]
    pub const fn service_ref(&self) -> Option<ServiceRef> {
        self.service_ref
    }

    /// Returns the append timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Binds this transition to the identifier the store assigned.
    #[must_use]
    pub const fn into_entry(self, id: TransitionId) -> TransitionLogEntry {
        TransitionLogEntry {
            id,
            task_id: self.task_id,
            state: self.state,
            service_ref: self.service_ref,
            created_at: self.created_at,
        }
    }
}

/// Persisted, immutable record of "the task was set to `state`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionLogEntry {
    id: TransitionId,
    task_id: TaskId,
    state: TaskState,
    service_ref: Option<ServiceRef>,
    created_at: DateTime<Utc>,
}

impl TransitionLogEntry {
    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> TransitionId {
        self.id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the recorded state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns the service reference, if a service was invoked.
    #[must_use]
    pub const fn service_ref(&self) -> Option<ServiceRef> {
        self.service_ref
    }

    /// Returns the append timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Display for TransitionLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.id, self.state)
    }
}
