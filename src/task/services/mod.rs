//! Application services for task graph orchestration.

mod store;

pub use store::{
    CreateTaskRequest, TaskService, TaskServiceError, TaskServiceResult, UpdateTaskRequest,
};
