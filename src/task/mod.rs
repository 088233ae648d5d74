//! Task graph storage.
//!
//! Tasks are epics, tasks, and subtasks distinguished only by a type tag.
//! Each task receives a human-readable code (`TASK-0001`) when it is created
//! and may be linked to other tasks through directed parent-to-child edges.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
