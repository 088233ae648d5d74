//! Storage adapters for artifacts.

pub mod sqlite;
