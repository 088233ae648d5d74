//! Domain model for the task graph.
//!
//! Validation of titles, descriptions, and the closed type and status
//! vocabularies happens here, before anything reaches storage.

mod code;
mod error;
mod ids;
mod relations;
mod status;
mod task;

pub use code::{TASK_CODE_PREFIX, TaskCode};
pub use error::TaskDomainError;
pub use ids::{TaskId, display_task_ids};
pub use relations::RelationChanges;
pub use status::{TaskStatus, TaskType};
pub use task::{NewTask, PersistedTaskData, Task, TaskPatch, TaskSummary};
