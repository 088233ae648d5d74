//! Repository port for artifacts, their versions, sources, and exports.

use crate::artifact::domain::{
    ArtifactExport, ArtifactId, ArtifactSnapshot, ArtifactSource, ArtifactVersion, ExportId,
    NewArtifactVersion, NewExport, SourceRefs, VersionId,
};
use crate::persistence::StoreError;
use crate::task::domain::{TaskId, display_task_ids};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for artifact repository operations.
pub type ArtifactRepositoryResult<T> = Result<T, ArtifactRepositoryError>;

/// Artifact persistence contract.
///
/// Versions are append-only: nothing here rewrites or removes a stored
/// version, source, or export.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtifactRepository: Send + Sync {
    /// Creates or updates the artifact, appends the next version, and
    /// attaches the payload's sources, all in one write. Returns the
    /// snapshot of the appended version.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactRepositoryError::ArtifactNotFound`] when the payload
    /// targets a missing artifact and
    /// [`ArtifactRepositoryError::UnknownSourceTasks`] when a source task
    /// does not exist. Nothing is stored in either case.
    async fn save_with_version(
        &self,
        payload: &NewArtifactVersion,
    ) -> ArtifactRepositoryResult<ArtifactSnapshot>;

    /// Returns the latest snapshot of every artifact, ordered by identifier.
    async fn list_latest(&self) -> ArtifactRepositoryResult<Vec<ArtifactSnapshot>>;

    /// Returns the latest snapshot of one artifact, or `None` when it does
    /// not exist.
    async fn find_latest(
        &self,
        artifact_id: ArtifactId,
    ) -> ArtifactRepositoryResult<Option<ArtifactSnapshot>>;

    /// Returns every version of an artifact in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactRepositoryError::ArtifactNotFound`] when the
    /// artifact does not exist.
    async fn list_versions(
        &self,
        artifact_id: ArtifactId,
    ) -> ArtifactRepositoryResult<Vec<ArtifactVersion>>;

    /// Attaches sources, or the manual fallback when `sources` is empty and
    /// the artifact has none yet. Returns the number of rows added.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactRepositoryError::ArtifactNotFound`] when the
    /// artifact does not exist and
    /// [`ArtifactRepositoryError::UnknownSourceTasks`] when any task does
    /// not exist, in which case nothing is attached.
    async fn attach_sources(
        &self,
        artifact_id: ArtifactId,
        sources: &SourceRefs,
        attached_at: DateTime<Utc>,
    ) -> ArtifactRepositoryResult<usize>;

    /// Returns the sources of an artifact.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactRepositoryError::ArtifactNotFound`] when the
    /// artifact does not exist.
    async fn list_sources(
        &self,
        artifact_id: ArtifactId,
    ) -> ArtifactRepositoryResult<Vec<ArtifactSource>>;

    /// Stores an export and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactRepositoryError::VersionNotFound`] when the version
    /// does not exist.
    async fn add_export(&self, export: &NewExport) -> ArtifactRepositoryResult<ExportId>;

    /// Returns the exports of a version, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactRepositoryError::VersionNotFound`] when the version
    /// does not exist.
    async fn list_exports(
        &self,
        version_id: VersionId,
    ) -> ArtifactRepositoryResult<Vec<ArtifactExport>>;
}

/// Errors returned by artifact repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ArtifactRepositoryError {
    /// The artifact was not found.
    #[error("artifact not found: {0}")]
    ArtifactNotFound(ArtifactId),

    /// The artifact version was not found.
    #[error("artifact version not found: {0}")]
    VersionNotFound(VersionId),

    /// Source task ids did not resolve to tasks.
    #[error("unknown source task ids: {}", display_task_ids(.0))]
    UnknownSourceTasks(Vec<TaskId>),

    /// No store connection could be obtained.
    #[error("artifact store unavailable: {0}")]
    Unavailable(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ArtifactRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<StoreError> for ArtifactRepositoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(reason) => Self::Unavailable(reason),
            other => Self::persistence(other),
        }
    }
}

impl From<diesel::result::Error> for ArtifactRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
