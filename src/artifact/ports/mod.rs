//! Port contracts for artifact storage.

pub mod repository;

#[cfg(test)]
pub use repository::MockArtifactRepository;
pub use repository::{ArtifactRepository, ArtifactRepositoryError, ArtifactRepositoryResult};
