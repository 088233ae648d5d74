//! Shared helpers for SQLite integration tests.

use atelier::StoreConfig;
use atelier::artifact::{
    adapters::sqlite::SqliteArtifactRepository,
    domain::ArtifactSnapshot,
    services::{ArtifactService, SaveArtifactRequest},
};
use atelier::persistence::Database;
use atelier::task::{
    adapters::sqlite::SqliteTaskRepository,
    domain::{Task, TaskId, TaskSummary},
    services::{CreateTaskRequest, TaskService},
};
use eyre::Result;
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;

/// Services wired to one private in-memory store.
pub struct StoreContext {
    pub database: Database,
    pub tasks: TaskService<SqliteTaskRepository, DefaultClock>,
    pub artifacts: ArtifactService<SqliteArtifactRepository, DefaultClock>,
}

impl StoreContext {
    /// Wires both services to an already opened store.
    pub fn over(database: Database) -> Self {
        let clock = Arc::new(DefaultClock);
        let tasks = TaskService::new(
            Arc::new(SqliteTaskRepository::new(database.clone())),
            Arc::clone(&clock),
        );
        let artifacts = ArtifactService::new(
            Arc::new(SqliteArtifactRepository::new(database.clone())),
            clock,
        );
        Self {
            database,
            tasks,
            artifacts,
        }
    }

    /// Creates a task of type `task` with the given title.
    pub async fn task(&self, title: &str) -> Result<Task> {
        let request = CreateTaskRequest::new("task", title, format!("{title} description"));
        Ok(self.tasks.create(request).await?)
    }

    /// Creates `count` tasks and returns their ids in creation order.
    pub async fn create_tasks(&self, count: usize) -> Result<Vec<TaskId>> {
        let mut ids = Vec::with_capacity(count);
        for index in 1..=count {
            ids.push(self.task(&format!("Task {index}")).await?.id());
        }
        Ok(ids)
    }

    /// Saves a first version of a new markdown document.
    pub async fn document(&self, title: &str, content: &str) -> Result<ArtifactSnapshot> {
        let request = SaveArtifactRequest::new(title, "text", "requirements", content);
        Ok(self.artifacts.save_artifact_with_version(request).await?)
    }
}

/// Opens a migrated in-memory store.
pub async fn open_store() -> Result<StoreContext> {
    let database = Database::open(&StoreConfig::in_memory()).await?;
    Ok(StoreContext::over(database))
}

/// Provides a fresh store for each test.
#[fixture]
pub async fn store() -> Result<StoreContext> {
    open_store().await
}

/// Collects the raw ids of related tasks.
pub fn ids_of(summaries: &[TaskSummary]) -> Vec<i64> {
    summaries.iter().map(|summary| summary.id().value()).collect()
}
