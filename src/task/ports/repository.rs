//! Repository port for task persistence and code allocation.

use crate::persistence::StoreError;
use crate::task::domain::{
    NewTask, RelationChanges, Task, TaskCode, TaskId, TaskPatch, display_task_ids,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task under the next free code and applies its initial
    /// relations in the same write.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::UnknownRelatedTasks`] when a relation
    /// names a missing task, or [`TaskRepositoryError::DuplicateCode`] when
    /// code allocation keeps colliding with concurrent writers.
    async fn create(&self, task: &NewTask, relations: &RelationChanges)
    -> TaskRepositoryResult<Task>;

    /// Replaces the fields set in `patch` and the relation directions set in
    /// `relations`, then returns the updated task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::UnknownRelatedTasks`] when a relation names
    /// a missing task.
    async fn update(
        &self,
        id: TaskId,
        patch: &TaskPatch,
        relations: &RelationChanges,
    ) -> TaskRepositoryResult<Task>;

    /// Returns every task with its relations, ordered by identifier.
    async fn list(&self) -> TaskRepositoryResult<Vec<Task>>;

    /// Removes a task and every edge touching it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository and link graph implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Relations referenced tasks that do not exist.
    #[error("unknown related task ids: {}", display_task_ids(.0))]
    UnknownRelatedTasks(Vec<TaskId>),

    /// Code allocation collided on every attempt.
    #[error("task code already allocated: {0}")]
    DuplicateCode(TaskCode),

    /// No store connection could be obtained.
    #[error("task store unavailable: {0}")]
    Unavailable(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<StoreError> for TaskRepositoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(reason) => Self::Unavailable(reason),
            other => Self::persistence(other),
        }
    }
}

impl From<diesel::result::Error> for TaskRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
