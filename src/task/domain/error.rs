//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The type is not one of `epic`, `task`, or `subtask`.
    #[error("unknown task type: {0}")]
    InvalidTaskType(String),

    /// The status is outside the canonical status set.
    #[error("unknown task status: {0}")]
    InvalidStatus(String),
}
