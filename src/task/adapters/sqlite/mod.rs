//! SQLite adapter implementing both task ports.

mod graph;
mod models;
mod repository;

pub(crate) use graph::missing_task_ids;
pub use repository::SqliteTaskRepository;
