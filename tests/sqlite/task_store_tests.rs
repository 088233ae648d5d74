//! Task creation, code allocation, update, and deletion against SQLite.

use atelier::ErrorKind;
use atelier::task::{
    domain::{TaskId, TaskStatus, TaskType},
    services::{CreateTaskRequest, TaskServiceError, UpdateTaskRequest},
};
use diesel::connection::SimpleConnection;
use eyre::Result;
use rstest::rstest;

use crate::sqlite::helpers::{StoreContext, ids_of, store};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn codes_are_allocated_in_sequence(#[future] store: Result<StoreContext>) -> Result<()> {
    let ctx = store.await?;

    let first = ctx.task("Design schema").await?;
    let second = ctx.task("Write adapter").await?;

    assert_eq!(first.code().as_str(), "TASK-0001");
    assert_eq!(second.code().as_str(), "TASK-0002");
    assert_eq!(first.status(), TaskStatus::Todo);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_code_is_reissued_after_deletion(#[future] store: Result<StoreContext>) -> Result<()> {
    let ctx = store.await?;
    let first = ctx.task("Short lived").await?;

    ctx.tasks.delete(first.id()).await?;
    let again = ctx.task("Second try").await?;

    assert_eq!(again.code().as_str(), "TASK-0001");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn highest_code_is_reissued_after_its_task_is_deleted(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;
    ctx.task("Keep").await?;
    let doomed = ctx.task("Drop").await?;

    ctx.tasks.delete(doomed.id()).await?;
    let replacement = ctx.task("Replace").await?;

    assert_eq!(replacement.code().as_str(), "TASK-0002");
    assert_ne!(replacement.id(), doomed.id());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creates_receive_distinct_codes(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;

    let (left, right) = tokio::join!(ctx.task("Left"), ctx.task("Right"));
    let (left, right) = (left?, right?);

    assert_ne!(left.code(), right.code());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn allocation_steps_over_codes_inserted_outside_the_store(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;
    ctx.task("Allocated").await?;
    ctx.database.pool().get()?.batch_execute(
        "INSERT INTO tasks (type, title, description, status, code, created_at) VALUES
            ('task', 'Imported', 'Hand numbered', 'todo', 'TASK-0009', '2024-01-01T00:00:00Z'),
            ('task', 'Short', 'Unpadded', 'todo', 'TASK-12', '2024-01-01T00:00:00Z'),
            ('task', 'Odd', 'Not numeric', 'todo', 'TASK-X1', '2024-01-01T00:00:00Z')",
    )?;

    let created = ctx.task("Next").await?;
    let following = ctx.task("After").await?;

    assert_eq!(created.code().as_str(), "TASK-0013");
    assert_eq!(following.code().as_str(), "TASK-0014");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_applies_status_and_relations(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;
    let epic = ctx
        .tasks
        .create(CreateTaskRequest::new("epic", "Checkout", "Payment flow"))
        .await?;

    let child = ctx
        .tasks
        .create(
            CreateTaskRequest::new("subtask", "Card form", "Collect card details")
                .with_status("in_progress")
                .with_parents([epic.id()]),
        )
        .await?;
    let reloaded_epic = ctx.tasks.get(epic.id()).await?;

    assert_eq!(child.task_type(), TaskType::Subtask);
    assert_eq!(child.status(), TaskStatus::InProgress);
    assert_eq!(ids_of(child.parents()), vec![epic.id().value()]);
    assert_eq!(ids_of(reloaded_epic.children()), vec![child.id().value()]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_with_unknown_parent_stores_nothing(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;

    let result = ctx
        .tasks
        .create(
            CreateTaskRequest::new("task", "Orphan", "Has no parent").with_parents([TaskId::new(42)]),
        )
        .await;

    let err = result.expect_err("unknown parent must be rejected");
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("42"));
    assert!(ctx.tasks.list().await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_changes_only_supplied_fields(#[future] store: Result<StoreContext>) -> Result<()> {
    let ctx = store.await?;
    let task = ctx.task("Draft").await?;

    let updated = ctx
        .tasks
        .update(
            task.id(),
            UpdateTaskRequest::new()
                .with_title("  Final  ")
                .with_status("done"),
        )
        .await?;

    assert_eq!(updated.title(), "Final");
    assert_eq!(updated.status(), TaskStatus::Done);
    assert_eq!(updated.description(), task.description());
    assert_eq!(updated.code(), task.code());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_rejects_missing_task_and_empty_request(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;
    let task = ctx.task("Existing").await?;

    let missing = ctx
        .tasks
        .update(TaskId::new(99), UpdateTaskRequest::new().with_status("review"))
        .await
        .expect_err("missing task");
    let empty = ctx
        .tasks
        .update(task.id(), UpdateTaskRequest::new())
        .await
        .expect_err("empty update");

    assert_eq!(missing.kind(), ErrorKind::NotFound);
    assert!(matches!(empty, TaskServiceError::NoChanges(id) if id == task.id()));
    Ok(())
}

#[rstest]
#[case("status", "open")]
#[case("type", "story")]
#[tokio::test(flavor = "multi_thread")]
async fn update_rejects_values_outside_the_vocabulary(
    #[future] store: Result<StoreContext>,
    #[case] field: &str,
    #[case] value: &str,
) -> Result<()> {
    let ctx = store.await?;
    let task = ctx.task("Strict").await?;
    let request = match field {
        "status" => UpdateTaskRequest::new().with_status(value),
        _ => UpdateTaskRequest::new().with_task_type(value),
    };

    let err = ctx
        .tasks
        .update(task.id(), request)
        .await
        .expect_err("invalid value");

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(ctx.tasks.get(task.id()).await?.status(), TaskStatus::Todo);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_edges_in_both_directions(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;
    let ids = ctx.create_tasks(3).await?;
    let (parent, middle, child) = (ids[0], ids[1], ids[2]);
    ctx.tasks
        .update(
            middle,
            UpdateTaskRequest::new()
                .with_parents([parent])
                .with_children([child]),
        )
        .await?;

    ctx.tasks.delete(middle).await?;

    assert!(ctx.tasks.get(parent).await?.children().is_empty());
    assert!(ctx.tasks.get(child).await?.parents().is_empty());
    let missing = ctx.tasks.delete(middle).await.expect_err("already deleted");
    assert_eq!(missing.kind(), ErrorKind::NotFound);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_returns_every_task_with_relations(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;
    let ids = ctx.create_tasks(3).await?;
    ctx.tasks
        .update(ids[0], UpdateTaskRequest::new().with_children([ids[1], ids[2]]))
        .await?;

    let tasks = ctx.tasks.list().await?;

    let listed: Vec<_> = tasks.iter().map(|task| task.id()).collect();
    assert_eq!(listed, ids);
    assert_eq!(
        ids_of(tasks[0].children()),
        vec![ids[1].value(), ids[2].value()]
    );
    assert_eq!(ids_of(tasks[2].parents()), vec![ids[0].value()]);
    Ok(())
}
