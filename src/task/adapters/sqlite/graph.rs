//! Edge maintenance and relation loading shared by the task adapter.

use super::models::TaskRow;
use crate::persistence::schema::{task_links, tasks};
use crate::task::{
    domain::{RelationChanges, Task, TaskCode, TaskId, TaskSummary},
    ports::{TaskRepositoryError, TaskRepositoryResult},
};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::collections::BTreeSet;

/// Returns the ids in `ids` that have no task row, in ascending order.
pub(crate) fn missing_task_ids(
    connection: &mut SqliteConnection,
    ids: &[i64],
) -> QueryResult<Vec<i64>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let found: BTreeSet<i64> = tasks::table
        .select(tasks::id)
        .filter(tasks::id.eq_any(ids.to_vec()))
        .load::<i64>(connection)?
        .into_iter()
        .collect();
    Ok(ids
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect())
}

pub(super) fn ensure_task_exists(
    connection: &mut SqliteConnection,
    id: TaskId,
) -> TaskRepositoryResult<()> {
    let exists = diesel::select(diesel::dsl::exists(tasks::table.find(id.value())))
        .get_result::<bool>(connection)?;
    if exists {
        Ok(())
    } else {
        Err(TaskRepositoryError::NotFound(id))
    }
}

/// Replaces the directions named in `changes`. Runs inside the caller's
/// transaction.
pub(super) fn replace_relations(
    connection: &mut SqliteConnection,
    id: TaskId,
    changes: &RelationChanges,
) -> TaskRepositoryResult<()> {
    if changes.is_empty() {
        return Ok(());
    }

    let referenced: Vec<i64> = changes
        .referenced_ids(id)
        .into_iter()
        .map(TaskId::value)
        .collect();
    let missing = missing_task_ids(connection, &referenced)?;
    if !missing.is_empty() {
        return Err(TaskRepositoryError::UnknownRelatedTasks(
            missing.into_iter().map(TaskId::new).collect(),
        ));
    }

    if let Some(parents) = changes.parents_for(id) {
        diesel::delete(task_links::table.filter(task_links::child_id.eq(id.value())))
            .execute(connection)?;
        for parent in parents {
            insert_edge(connection, parent, id)?;
        }
    }
    if let Some(children) = changes.children_for(id) {
        diesel::delete(task_links::table.filter(task_links::parent_id.eq(id.value())))
            .execute(connection)?;
        for child in children {
            insert_edge(connection, id, child)?;
        }
    }
    Ok(())
}

fn insert_edge(
    connection: &mut SqliteConnection,
    parent: TaskId,
    child: TaskId,
) -> QueryResult<usize> {
    diesel::insert_or_ignore_into(task_links::table)
        .values((
            task_links::parent_id.eq(parent.value()),
            task_links::child_id.eq(child.value()),
        ))
        .execute(connection)
}

/// Removes every edge touching `id`.
pub(super) fn remove_edges(connection: &mut SqliteConnection, id: TaskId) -> QueryResult<usize> {
    diesel::delete(
        task_links::table.filter(
            task_links::parent_id
                .eq(id.value())
                .or(task_links::child_id.eq(id.value())),
        ),
    )
    .execute(connection)
}

/// Loads a task and resolves both adjacency lists through joins.
pub(super) fn load_with_relations(
    connection: &mut SqliteConnection,
    id: TaskId,
) -> TaskRepositoryResult<Option<Task>> {
    let Some(row) = tasks::table
        .find(id.value())
        .select(TaskRow::as_select())
        .first::<TaskRow>(connection)
        .optional()?
    else {
        return Ok(None);
    };

    let parents = task_links::table
        .inner_join(tasks::table.on(tasks::id.eq(task_links::parent_id)))
        .filter(task_links::child_id.eq(id.value()))
        .select((tasks::id, tasks::code, tasks::title))
        .order(tasks::id.asc())
        .load::<(i64, String, String)>(connection)?;
    let children = task_links::table
        .inner_join(tasks::table.on(tasks::id.eq(task_links::child_id)))
        .filter(task_links::parent_id.eq(id.value()))
        .select((tasks::id, tasks::code, tasks::title))
        .order(tasks::id.asc())
        .load::<(i64, String, String)>(connection)?;

    Ok(Some(
        row.into_task()?
            .with_relations(into_summaries(parents), into_summaries(children)),
    ))
}

fn into_summaries(rows: Vec<(i64, String, String)>) -> Vec<TaskSummary> {
    rows.into_iter()
        .map(|(id, code, title)| {
            TaskSummary::new(TaskId::new(id), TaskCode::from_persisted(code), title)
        })
        .collect()
}
