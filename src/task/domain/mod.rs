//! Domain model for task lifecycle tracking.
//!
//! A task holds its current state; every state change is also recorded as an
//! append-only [`TransitionLogEntry`] that may point at a service record.
//! Infrastructure concerns stay outside of the domain boundary.

mod error;
mod ids;
mod task;
mod transition;

pub use error::{ParseTaskStateError, TaskDomainError};
pub use ids::{TaskId, TaskIdentifier, TaskName, TransitionId};
pub use task::{PersistedTaskData, Task, TaskState};
pub use transition::{NewTransition, TransitionLogEntry};
