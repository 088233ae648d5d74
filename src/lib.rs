//! Atelier: persistence core for a hierarchical work-item graph and a
//! versioned repository of documents derived from it.
//!
//! The crate owns the data-consistency engine behind an agent-driven
//! planning tool: task code allocation, parent/child link maintenance,
//! in-place evolution of the task status enumeration, and append-only
//! artifact versioning with provenance and rendered exports.
//!
//! # Architecture
//!
//! Atelier follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business types and validation with no storage concerns
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: Concrete SQLite implementations of the ports
//! - **Services**: Request validation and orchestration over the ports
//!
//! # Modules
//!
//! - [`persistence`]: Store lifecycle and schema migration
//! - [`task`]: Task records, codes, and the parent/child link graph
//! - [`artifact`]: Artifact versions, provenance sources, and exports

pub mod artifact;
pub mod config;
pub mod error;
pub mod persistence;
pub mod task;

pub use config::StoreConfig;
pub use error::ErrorKind;
