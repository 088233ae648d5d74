//! Port for directed parent-to-child edges between tasks.

use super::TaskRepositoryResult;
use crate::task::domain::{RelationChanges, Task, TaskId};
use async_trait::async_trait;

/// Link graph contract.
///
/// Edges are unique ordered pairs and never loop back to the same task.
/// Cycles across several tasks are not prevented.
#[async_trait]
pub trait TaskLinkGraph: Send + Sync {
    /// Replaces the directions set in `changes` for task `id`.
    ///
    /// Self references are dropped and duplicates collapse into one edge.
    /// A direction left unset keeps its existing edges.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when `id` does not exist and
    /// [`TaskRepositoryError::UnknownRelatedTasks`] when a listed task does
    /// not exist.
    ///
    /// [`TaskRepositoryError::NotFound`]: super::TaskRepositoryError::NotFound
    /// [`TaskRepositoryError::UnknownRelatedTasks`]: super::TaskRepositoryError::UnknownRelatedTasks
    async fn set_relations(&self, id: TaskId, changes: &RelationChanges)
    -> TaskRepositoryResult<Task>;

    /// Finds a task with its parent and child summaries.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_with_relations(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;
}
