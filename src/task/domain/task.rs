//! Task aggregate root and task lifecycle state.

use super::{ParseTaskStateError, TaskId, TaskIdentifier, TaskName};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle state.
///
/// Any state may follow any other; the transition log records what was set,
/// not whether it was allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Task has been registered.
    #[default]
    Init,
    /// Task is being worked on.
    Processing,
    /// Task finished successfully.
    Complete,
    /// Task failed.
    Fail,
    /// Task resumed after a pause or failure.
    Resume,
    /// Task was restarted from the beginning.
    Restart,
}

impl TaskState {
    /// Every state, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Init,
        Self::Processing,
        Self::Complete,
        Self::Fail,
        Self::Resume,
        Self::Restart,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Processing => "processing",
            Self::Complete => "complete",
            Self::Fail => "fail",
            Self::Resume => "resume",
            Self::Restart => "restart",
        }
    }
}

impl TryFrom<&str> for TaskState {
    type Error = ParseTaskStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "init" => Ok(Self::Init),
            "processing" => Ok(Self::Processing),
            "complete" => Ok(Self::Complete),
            "fail" => Ok(Self::Fail),
            "resume" => Ok(Self::Resume),
            "restart" => Ok(Self::Restart),
            _ => Err(ParseTaskStateError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    name: TaskName,
    identifier: TaskIdentifier,
    state: TaskState,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted task name.
    pub name: TaskName,
    /// Persisted external identifier.
    pub identifier: TaskIdentifier,
    /// Persisted lifecycle state.
    pub state: TaskState,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub modified_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in `initial_state`.
    #[must_use]
    pub fn new(
        name: TaskName,
        identifier: TaskIdentifier,
        initial_state: TaskState,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            name,
            identifier,
            state: initial_state,
            created_at: timestamp,
            modified_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            identifier: data.identifier,
            state: data.state,
            created_at: data.created_at,
            modified_at: data.modified_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task name.
    #[must_use]
    pub const fn name(&self) -> &TaskName {
        &self.name
    }

    /// Returns the external identifier.
    #[must_use]
    pub const fn identifier(&self) -> &TaskIdentifier {
        &self.identifier
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    /// Sets the lifecycle state and refreshes `modified_at`.
    ///
    /// No legality check is made between the current and the new state.
    pub fn change_state(&mut self, new_state: TaskState, clock: &impl Clock) {
        self.state = new_state;
        self.modified_at = clock.utc();
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} || {}", self.id, self.name, self.state)
    }
}
