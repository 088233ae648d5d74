//! SQLite adapter for artifacts, versions, sources, and exports.

mod exports;
mod models;
mod repository;
mod snapshots;
mod sources;

pub use repository::SqliteArtifactRepository;
