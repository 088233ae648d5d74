//! Shared SQLite store: connection lifecycle, table definitions, and schema
//! migration.
//!
//! A single [`Database`] handle is created at process start, migrated with
//! [`SchemaMigrator`], and then passed to every adapter by value (the handle
//! is a cheap clone of the underlying pool). Dropping the last handle closes
//! the connections.

mod database;
mod error;
mod migrator;
pub(crate) mod schema;
pub(crate) mod timestamp;

pub use database::{Database, SqlitePool};
pub use error::StoreError;
pub use migrator::{
    CANONICAL_STATUS_CHECK, LEGACY_STATUS_REMAP, LEGACY_TASKS_TABLE, MigrationReport,
    SchemaMigrator,
};
