//! Task record, its summary projection, and write payloads.

use super::{TaskCode, TaskDomainError, TaskId, TaskStatus, TaskType};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Compact reference to a related task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    id: TaskId,
    code: TaskCode,
    title: String,
}

impl TaskSummary {
    /// Creates a summary.
    #[must_use]
    pub fn new(id: TaskId, code: TaskCode, title: impl Into<String>) -> Self {
        Self {
            id,
            code,
            title: title.into(),
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task code.
    #[must_use]
    pub const fn code(&self) -> &TaskCode {
        &self.code
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// A stored task together with its resolved parent and child summaries.
///
/// Serialises with camelCase field names and the type under `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    #[serde(rename = "type")]
    task_type: TaskType,
    title: String,
    description: String,
    status: TaskStatus,
    code: TaskCode,
    created_at: DateTime<Utc>,
    parents: Vec<TaskSummary>,
    children: Vec<TaskSummary>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted type.
    pub task_type: TaskType,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted code.
    pub code: TaskCode,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Reconstructs a task from storage with no relations attached.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            task_type: data.task_type,
            title: data.title,
            description: data.description,
            status: data.status,
            code: data.code,
            created_at: data.created_at,
            parents: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Attaches resolved relations.
    #[must_use]
    pub fn with_relations(mut self, parents: Vec<TaskSummary>, children: Vec<TaskSummary>) -> Self {
        self.parents = parents;
        self.children = children;
        self
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task type.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the code.
    #[must_use]
    pub const fn code(&self) -> &TaskCode {
        &self.code
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the parents, ordered by identifier.
    #[must_use]
    pub fn parents(&self) -> &[TaskSummary] {
        &self.parents
    }

    /// Returns the children, ordered by identifier.
    #[must_use]
    pub fn children(&self) -> &[TaskSummary] {
        &self.children
    }

    /// Returns the summary used when this task appears as a relation.
    #[must_use]
    pub fn summary(&self) -> TaskSummary {
        TaskSummary::new(self.id, self.code.clone(), self.title.clone())
    }
}

/// Validated payload for creating a task. The code is allocated by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    task_type: TaskType,
    title: String,
    description: String,
    status: TaskStatus,
    created_at: DateTime<Utc>,
}

impl NewTask {
    /// Creates a task payload with the initial status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] or
    /// [`TaskDomainError::EmptyDescription`] when either is blank.
    pub fn new(
        task_type: TaskType,
        title: impl Into<String>,
        description: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        Ok(Self {
            task_type,
            title: required(title.into(), TaskDomainError::EmptyTitle)?,
            description: required(description.into(), TaskDomainError::EmptyDescription)?,
            status: TaskStatus::default(),
            created_at: clock.utc(),
        })
    }

    /// Overrides the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the task type.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Returns the trimmed title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the trimmed description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Partial update of a task's fields. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    task_type: Option<TaskType>,
    title: Option<String>,
    description: Option<String>,
    status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the type.
    #[must_use]
    pub const fn with_task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = Some(task_type);
        self
    }

    /// Replaces the title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn with_title(mut self, title: impl Into<String>) -> Result<Self, TaskDomainError> {
        self.title = Some(required(title.into(), TaskDomainError::EmptyTitle)?);
        Ok(self)
    }

    /// Replaces the description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyDescription`] when the description is
    /// blank.
    pub fn with_description(
        mut self,
        description: impl Into<String>,
    ) -> Result<Self, TaskDomainError> {
        self.description = Some(required(
            description.into(),
            TaskDomainError::EmptyDescription,
        )?);
        Ok(self)
    }

    /// Replaces the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns the replacement type, if any.
    #[must_use]
    pub const fn task_type(&self) -> Option<TaskType> {
        self.task_type
    }

    /// Returns the replacement title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the replacement description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the replacement status, if any.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns `true` when no field is replaced.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.task_type.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
    }
}

fn required(value: String, error: TaskDomainError) -> Result<String, TaskDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    if trimmed.len() == value.len() {
        return Ok(value);
    }
    Ok(trimmed.to_owned())
}
