//! Port contracts for the task graph.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod graph;
pub mod repository;

pub use graph::TaskLinkGraph;
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
