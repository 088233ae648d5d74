//! SQLite repository implementation for tasks and their links.

use super::{
    graph::{ensure_task_exists, load_with_relations, remove_edges, replace_relations},
    models::{NewTaskRow, TaskChangeset, TaskRow},
};
use crate::persistence::Database;
use crate::persistence::schema::{task_links, tasks};
use crate::task::{
    domain::{
        NewTask, RelationChanges, TASK_CODE_PREFIX, Task, TaskCode, TaskId, TaskPatch,
        TaskSummary,
    },
    ports::{TaskLinkGraph, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use std::collections::HashMap;
use tracing::debug;

/// SQLite-backed task repository and link graph.
#[derive(Debug, Clone)]
pub struct SqliteTaskRepository {
    database: Database,
}

impl SqliteTaskRepository {
    /// Creates a repository over the shared store.
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn create(
        &self,
        task: &NewTask,
        relations: &RelationChanges,
    ) -> TaskRepositoryResult<Task> {
        let new_task = task.clone();
        let changes = relations.clone();
        self.database
            .run_blocking(move |connection| {
                connection.immediate_transaction(|tx| insert_task(tx, &new_task, &changes))
            })
            .await
    }

    async fn update(
        &self,
        id: TaskId,
        patch: &TaskPatch,
        relations: &RelationChanges,
    ) -> TaskRepositoryResult<Task> {
        let task_patch = patch.clone();
        let changes = relations.clone();
        self.database
            .run_blocking(move |connection| {
                connection.immediate_transaction(|tx| {
                    ensure_task_exists(tx, id)?;
                    if !task_patch.is_empty() {
                        diesel::update(tasks::table.find(id.value()))
                            .set(TaskChangeset::from(&task_patch))
                            .execute(tx)?;
                    }
                    replace_relations(tx, id, &changes)?;
                    load_with_relations(tx, id)?.ok_or(TaskRepositoryError::NotFound(id))
                })
            })
            .await
    }

    async fn list(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.database
            .run_blocking(|connection| connection.transaction(list_tasks))
            .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.database
            .run_blocking(move |connection| {
                connection.immediate_transaction(|tx| {
                    ensure_task_exists(tx, id)?;
                    remove_edges(tx, id)?;
                    diesel::delete(tasks::table.find(id.value())).execute(tx)?;
                    Ok(())
                })
            })
            .await
    }
}

#[async_trait]
impl TaskLinkGraph for SqliteTaskRepository {
    async fn set_relations(
        &self,
        id: TaskId,
        changes: &RelationChanges,
    ) -> TaskRepositoryResult<Task> {
        let relation_changes = changes.clone();
        self.database
            .run_blocking(move |connection| {
                connection.immediate_transaction(|tx| {
                    ensure_task_exists(tx, id)?;
                    replace_relations(tx, id, &relation_changes)?;
                    load_with_relations(tx, id)?.ok_or(TaskRepositoryError::NotFound(id))
                })
            })
            .await
    }

    async fn find_with_relations(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.database
            .run_blocking(move |connection| {
                connection.transaction(|tx| load_with_relations(tx, id))
            })
            .await
    }
}

/// Allocates the next code and inserts the task. The immediate transaction
/// holds the write lock, so no other writer can take the same code between
/// the read and the insert. The allocated number is above every parsed
/// `TASK-` code, including codes inserted outside this adapter. A collision
/// reported by the unique index surfaces as
/// [`TaskRepositoryError::DuplicateCode`].
fn insert_task(
    connection: &mut SqliteConnection,
    task: &NewTask,
    relations: &RelationChanges,
) -> TaskRepositoryResult<Task> {
    let existing = tasks::table
        .select(tasks::code)
        .filter(tasks::code.like(format!("{TASK_CODE_PREFIX}-%")))
        .load::<String>(connection)?;
    let code = TaskCode::next_after(existing.iter().map(String::as_str));

    let inserted = diesel::insert_into(tasks::table)
        .values(NewTaskRow::new(task, &code))
        .returning(TaskRow::as_returning())
        .get_result::<TaskRow>(connection)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                TaskRepositoryError::DuplicateCode(code.clone())
            }
            other => TaskRepositoryError::persistence(other),
        })?;
    debug!(%code, id = inserted.id, "allocated task code");

    let id = TaskId::new(inserted.id);
    replace_relations(connection, id, relations)?;
    load_with_relations(connection, id)?.ok_or(TaskRepositoryError::NotFound(id))
}

/// Loads every task and every edge once, then projects relations per task.
fn list_tasks(connection: &mut SqliteConnection) -> TaskRepositoryResult<Vec<Task>> {
    let tasks = tasks::table
        .select(TaskRow::as_select())
        .order(tasks::id.asc())
        .load::<TaskRow>(connection)?
        .into_iter()
        .map(TaskRow::into_task)
        .collect::<TaskRepositoryResult<Vec<_>>>()?;
    let edges = task_links::table
        .select((task_links::parent_id, task_links::child_id))
        .order((task_links::parent_id.asc(), task_links::child_id.asc()))
        .load::<(i64, i64)>(connection)?;

    let summaries: HashMap<TaskId, TaskSummary> =
        tasks.iter().map(|task| (task.id(), task.summary())).collect();
    let mut parents: HashMap<TaskId, Vec<TaskSummary>> = HashMap::new();
    let mut children: HashMap<TaskId, Vec<TaskSummary>> = HashMap::new();
    for (parent_id, child_id) in edges {
        let parent = TaskId::new(parent_id);
        let child = TaskId::new(child_id);
        if let Some(summary) = summaries.get(&parent) {
            parents.entry(child).or_default().push(summary.clone());
        }
        if let Some(summary) = summaries.get(&child) {
            children.entry(parent).or_default().push(summary.clone());
        }
    }

    Ok(tasks
        .into_iter()
        .map(|task| {
            let id = task.id();
            task.with_relations(
                parents.remove(&id).unwrap_or_default(),
                children.remove(&id).unwrap_or_default(),
            )
        })
        .collect())
}
