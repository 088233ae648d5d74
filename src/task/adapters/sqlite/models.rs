//! Diesel row models for task persistence.

use crate::persistence::{schema::tasks, timestamp};
use crate::task::{
    domain::{NewTask, PersistedTaskData, Task, TaskCode, TaskId, TaskPatch, TaskStatus, TaskType},
    ports::{TaskRepositoryError, TaskRepositoryResult},
};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(super) struct TaskRow {
    pub id: i64,
    pub task_type: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub code: String,
    pub created_at: String,
}

impl TaskRow {
    pub(super) fn into_task(self) -> TaskRepositoryResult<Task> {
        let task_type =
            TaskType::try_from(self.task_type.as_str()).map_err(TaskRepositoryError::persistence)?;
        let status =
            TaskStatus::try_from(self.status.as_str()).map_err(TaskRepositoryError::persistence)?;
        let created_at =
            timestamp::decode(&self.created_at).map_err(TaskRepositoryError::persistence)?;

        Ok(Task::from_persisted(PersistedTaskData {
            id: TaskId::new(self.id),
            task_type,
            title: self.title,
            description: self.description,
            status,
            code: TaskCode::from_persisted(self.code),
            created_at,
        }))
    }
}

/// Insert model for task records.
#[derive(Debug, Insertable)]
#[diesel(table_name = tasks)]
pub(super) struct NewTaskRow<'a> {
    pub task_type: &'static str,
    pub title: &'a str,
    pub description: &'a str,
    pub status: &'static str,
    pub code: &'a str,
    pub created_at: String,
}

impl<'a> NewTaskRow<'a> {
    pub(super) fn new(task: &'a NewTask, code: &'a TaskCode) -> Self {
        Self {
            task_type: task.task_type().as_str(),
            title: task.title(),
            description: task.description(),
            status: task.status().as_str(),
            code: code.as_str(),
            created_at: timestamp::encode(task.created_at()),
        }
    }
}

/// Partial update model; `None` columns are left untouched.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = tasks)]
pub(super) struct TaskChangeset<'a> {
    pub task_type: Option<&'static str>,
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub status: Option<&'static str>,
}

impl<'a> From<&'a TaskPatch> for TaskChangeset<'a> {
    fn from(patch: &'a TaskPatch) -> Self {
        Self {
            task_type: patch.task_type().map(TaskType::as_str),
            title: patch.title(),
            description: patch.description(),
            status: patch.status().map(TaskStatus::as_str),
        }
    }
}
