//! Service layer validating raw task input before it reaches storage.

use crate::error::ErrorKind;
use crate::task::{
    domain::{
        NewTask, RelationChanges, Task, TaskDomainError, TaskId, TaskPatch, TaskStatus, TaskType,
    },
    ports::{TaskLinkGraph, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    task_type: String,
    title: String,
    description: String,
    status: Option<String>,
    relations: RelationChanges,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        task_type: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            task_type: task_type.into(),
            title: title.into(),
            description: description.into(),
            status: None,
            relations: RelationChanges::new(),
        }
    }

    /// Sets the initial status instead of `todo`.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Links the new task under `parents`.
    #[must_use]
    pub fn with_parents(mut self, parents: impl IntoIterator<Item = TaskId>) -> Self {
        self.relations = self.relations.with_parents(parents);
        self
    }

    /// Links `children` under the new task.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = TaskId>) -> Self {
        self.relations = self.relations.with_children(children);
        self
    }
}

/// Request payload for a partial task update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    task_type: Option<String>,
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    relations: RelationChanges,
}

impl UpdateTaskRequest {
    /// Creates a request that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the type.
    #[must_use]
    pub fn with_task_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = Some(task_type.into());
        self
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Replaces every parent edge.
    #[must_use]
    pub fn with_parents(mut self, parents: impl IntoIterator<Item = TaskId>) -> Self {
        self.relations = self.relations.with_parents(parents);
        self
    }

    /// Replaces every child edge.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = TaskId>) -> Self {
        self.relations = self.relations.with_children(children);
        self
    }

    fn into_patch(self) -> Result<(TaskPatch, RelationChanges), TaskDomainError> {
        let mut patch = TaskPatch::new();
        if let Some(task_type) = self.task_type {
            patch = patch.with_task_type(TaskType::try_from(task_type.as_str())?);
        }
        if let Some(title) = self.title {
            patch = patch.with_title(title)?;
        }
        if let Some(description) = self.description {
            patch = patch.with_description(description)?;
        }
        if let Some(status) = self.status {
            patch = patch.with_status(TaskStatus::try_from(status.as_str())?);
        }
        Ok((patch, self.relations))
    }
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// An update supplied neither field changes nor relation changes.
    #[error("update for task {0} supplies no changes")]
    NoChanges(TaskId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

impl TaskServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_)
            | Self::NoChanges(_)
            | Self::Repository(TaskRepositoryError::UnknownRelatedTasks(_)) => ErrorKind::Validation,
            Self::Repository(TaskRepositoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::Repository(TaskRepositoryError::Unavailable(_)) => ErrorKind::Unavailable,
            Self::Repository(
                TaskRepositoryError::DuplicateCode(_) | TaskRepositoryError::Persistence(_),
            ) => ErrorKind::Internal,
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task graph orchestration service.
#[derive(Clone)]
pub struct TaskService<R, C>
where
    R: TaskRepository + TaskLinkGraph,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskService<R, C>
where
    R: TaskRepository + TaskLinkGraph,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Validates and stores a new task, applying any requested relations.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] for blank or out-of-vocabulary
    /// input and [`TaskServiceError::Repository`] when storage rejects the
    /// task or its relations.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskServiceResult<Task> {
        let task_type = TaskType::try_from(request.task_type.as_str())?;
        let mut task = NewTask::new(
            task_type,
            request.title,
            request.description,
            &*self.clock,
        )?;
        if let Some(status) = request.status {
            task = task.with_status(TaskStatus::try_from(status.as_str())?);
        }
        Ok(self.repository.create(&task, &request.relations).await?)
    }

    /// Applies a partial update and any relation replacement.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NoChanges`] when the request is empty,
    /// [`TaskServiceError::Domain`] for invalid field values, and
    /// [`TaskServiceError::Repository`] when the task does not exist.
    pub async fn update(&self, id: TaskId, request: UpdateTaskRequest) -> TaskServiceResult<Task> {
        let (patch, relations) = request.into_patch()?;
        if patch.is_empty() && relations.is_empty() {
            return Err(TaskServiceError::NoChanges(id));
        }
        Ok(self.repository.update(id, &patch, &relations).await?)
    }

    /// Returns a task with its relations.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] (wrapped) when the task does
    /// not exist.
    pub async fn get(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.repository
            .find_with_relations(id)
            .await?
            .ok_or(TaskServiceError::Repository(TaskRepositoryError::NotFound(
                id,
            )))
    }

    /// Returns every task with its relations.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the store fails.
    pub async fn list(&self) -> TaskServiceResult<Vec<Task>> {
        Ok(self.repository.list().await?)
    }

    /// Deletes a task and its edges.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the task does not exist.
    pub async fn delete(&self, id: TaskId) -> TaskServiceResult<()> {
        Ok(self.repository.delete(id).await?)
    }

    /// Replaces parent and/or child edges of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the task or a listed
    /// relation does not exist.
    pub async fn set_relations(
        &self,
        id: TaskId,
        changes: &RelationChanges,
    ) -> TaskServiceResult<Task> {
        Ok(self.repository.set_relations(id, changes).await?)
    }
}
