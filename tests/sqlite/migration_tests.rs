//! Schema start-up and legacy status rewrite against SQLite.

use atelier::StoreConfig;
use atelier::persistence::{Database, LEGACY_TASKS_TABLE, SchemaMigrator};
use atelier::task::domain::{Task, TaskStatus};
use diesel::connection::SimpleConnection;
use eyre::Result;
use rstest::rstest;

use crate::sqlite::helpers::StoreContext;

const LEGACY_TASKS: &str = "CREATE TABLE tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    type TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('open', 'in_progress', 'completed')),
    code TEXT,
    created_at TEXT
);
INSERT INTO tasks (id, type, title, description, status, code, created_at) VALUES
    (1, 'epic', 'Checkout', 'Payment flow', 'open', 'TASK-0001', '2024-01-02T03:04:05Z'),
    (2, 'task', 'Card form', 'Collect details', 'in_progress', 'TASK-0002', '2024-01-02 03:04:06'),
    (3, 'task', 'Receipts', 'Email receipts', 'completed', NULL, NULL);";

/// Connects without migrating and seeds the store with `sql`.
fn seeded(sql: &str) -> Result<Database> {
    let database = Database::connect(&StoreConfig::in_memory())?;
    database.pool().get()?.batch_execute(sql)?;
    Ok(database)
}

fn statuses(tasks: &[Task]) -> Vec<TaskStatus> {
    tasks.iter().map(|task| task.status()).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fresh_store_starts_empty_and_stays_stable() -> Result<()> {
    let database = Database::connect(&StoreConfig::in_memory())?;
    let migrator = SchemaMigrator::new(database.clone());

    let first = migrator.ensure_schema().await?;
    let second = migrator.ensure_schema().await?;
    let ctx = StoreContext::over(database);

    assert!(!first.status_rewritten);
    assert!(!second.status_rewritten);
    assert!(ctx.tasks.list().await?.is_empty());
    assert!(ctx.artifacts.list_latest_artifacts().await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn legacy_statuses_are_rewritten_in_place() -> Result<()> {
    let database = seeded(LEGACY_TASKS)?;

    let report = SchemaMigrator::new(database.clone()).ensure_schema().await?;
    let ctx = StoreContext::over(database);
    let tasks = ctx.tasks.list().await?;

    assert!(report.status_rewritten);
    assert!(!report.resumed);
    assert_eq!(report.rows_copied, 3);
    assert_eq!(
        statuses(&tasks),
        vec![TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done]
    );
    assert_eq!(tasks[0].title(), "Checkout");
    assert_eq!(tasks[2].code().as_str(), "TASK-0003");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rewritten_store_accepts_new_work() -> Result<()> {
    let database = seeded(LEGACY_TASKS)?;
    SchemaMigrator::new(database.clone()).ensure_schema().await?;
    let ctx = StoreContext::over(database);

    let created = ctx.task("After migration").await?;
    let again = SchemaMigrator::new(ctx.database.clone())
        .ensure_schema()
        .await?;

    assert_eq!(created.code().as_str(), "TASK-0004");
    assert!(!again.status_rewritten);
    assert_eq!(ctx.tasks.list().await?.len(), 4);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn interrupted_rewrite_is_resumed() -> Result<()> {
    let database = seeded(&format!(
        "{LEGACY_TASKS}\nALTER TABLE tasks RENAME TO {LEGACY_TASKS_TABLE};"
    ))?;

    let report = SchemaMigrator::new(database.clone()).ensure_schema().await?;
    let ctx = StoreContext::over(database);

    assert!(report.status_rewritten);
    assert!(report.resumed);
    assert_eq!(
        statuses(&ctx.tasks.list().await?),
        vec![TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn canonical_table_rejects_legacy_statuses() -> Result<()> {
    let database = Database::open(&StoreConfig::in_memory()).await?;

    let result = database.pool().get()?.batch_execute(
        "INSERT INTO tasks (type, title, description, status, code, created_at)
         VALUES ('task', 't', 'd', 'open', 'TASK-0001', '2024-01-01T00:00:00Z')",
    );

    assert!(result.is_err());
    Ok(())
}
