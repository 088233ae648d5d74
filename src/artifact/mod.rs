//! Versioned artifact repository.
//!
//! Artifacts are titled, categorised documents and diagrams derived from the
//! task graph. Every save appends an immutable version; provenance sources
//! link an artifact back to the tasks and messages that motivated it, and
//! exports attach rendered forms to a single version.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
