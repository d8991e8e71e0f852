//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// The task name exceeds the storage limit.
    #[error("task name exceeds {max} characters (got {length})")]
    TaskNameTooLong {
        /// Character count of the rejected value.
        length: usize,
        /// Maximum permitted character count.
        max: usize,
    },

    /// The task identifier is empty after trimming.
    #[error("task identifier must not be empty")]
    EmptyTaskIdentifier,

    /// The task identifier exceeds the storage limit.
    #[error("task identifier exceeds {max} characters (got {length})")]
    TaskIdentifierTooLong {
        /// Character count of the rejected value.
        length: usize,
        /// Maximum permitted character count.
        max: usize,
    },
}

/// Error returned while parsing task states.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task state: {0}")]
pub struct ParseTaskStateError(pub String);
