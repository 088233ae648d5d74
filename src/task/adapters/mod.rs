//! Storage adapters for the task graph.

pub mod sqlite;
