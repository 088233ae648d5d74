//! Service layer validating artifact input before it reaches storage.

use super::render::render_markdown;
use crate::artifact::{
    domain::{
        ArtifactDomainError, ArtifactExport, ArtifactId, ArtifactKind, ArtifactSnapshot,
        ArtifactSource, ArtifactVersion, ExportFormat, ExportId, ExportPayload,
        NewArtifactVersion, NewExport, SourceRefs, VersionFormat, VersionId, normalize_category,
    },
    ports::{ArtifactRepository, ArtifactRepositoryError},
};
use crate::error::ErrorKind;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Request payload for saving a new version of an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveArtifactRequest {
    artifact_id: Option<ArtifactId>,
    title: String,
    kind: String,
    category: String,
    content: String,
    format: Option<String>,
    render_url: Option<String>,
    notes: Option<String>,
    task_ids: Vec<i64>,
    message_ids: Vec<i64>,
}

impl SaveArtifactRequest {
    /// Creates a request for a new artifact.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        kind: impl Into<String>,
        category: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            artifact_id: None,
            title: title.into(),
            kind: kind.into(),
            category: category.into(),
            content: content.into(),
            format: None,
            render_url: None,
            notes: None,
            task_ids: Vec::new(),
            message_ids: Vec::new(),
        }
    }

    /// Saves onto an existing artifact instead of creating one.
    #[must_use]
    pub const fn for_artifact(mut self, artifact_id: ArtifactId) -> Self {
        self.artifact_id = Some(artifact_id);
        self
    }

    /// Sets the version format instead of the kind's default.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Records a render location.
    #[must_use]
    pub fn with_render_url(mut self, render_url: impl Into<String>) -> Self {
        self.render_url = Some(render_url.into());
        self
    }

    /// Attaches a note to the version.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Records the tasks this artifact derives from.
    #[must_use]
    pub fn with_task_ids(mut self, task_ids: impl IntoIterator<Item = i64>) -> Self {
        self.task_ids = task_ids.into_iter().collect();
        self
    }

    /// Records the messages this artifact derives from.
    #[must_use]
    pub fn with_message_ids(mut self, message_ids: impl IntoIterator<Item = i64>) -> Self {
        self.message_ids = message_ids.into_iter().collect();
        self
    }

    fn into_payload(self, clock: &impl Clock) -> Result<NewArtifactVersion, ArtifactDomainError> {
        let kind = ArtifactKind::try_from(self.kind.as_str())?;
        let category = normalize_category(&self.category)?;
        let mut payload = NewArtifactVersion::new(self.title, kind, category, self.content, clock)?
            .with_sources(SourceRefs::from_raw(&self.task_ids, &self.message_ids));
        if let Some(artifact_id) = self.artifact_id {
            payload = payload.with_artifact_id(artifact_id);
        }
        if let Some(format) = self.format {
            payload = payload.with_format(VersionFormat::try_from(format.as_str())?);
        }
        if let Some(render_url) = self.render_url {
            payload = payload.with_render_url(render_url);
        }
        if let Some(notes) = self.notes {
            payload = payload.with_notes(notes);
        }
        Ok(payload)
    }
}

/// Request payload for attaching an export to a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddExportRequest {
    version_id: VersionId,
    format: String,
    content: Option<String>,
    location: Option<String>,
}

impl AddExportRequest {
    /// Creates a request with neither content nor location set.
    #[must_use]
    pub fn new(version_id: VersionId, format: impl Into<String>) -> Self {
        Self {
            version_id,
            format: format.into(),
            content: None,
            location: None,
        }
    }

    /// Stores the export inline.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Records where the export lives.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Service-level errors for artifact operations.
#[derive(Debug, Error)]
pub enum ArtifactServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ArtifactDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ArtifactRepositoryError),

    /// A snapshot could not be rendered.
    #[error("failed to render artifact {artifact_id}: {reason}")]
    Render {
        /// Artifact being rendered.
        artifact_id: ArtifactId,
        /// Template engine failure.
        reason: String,
    },
}

impl ArtifactServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) | Self::Repository(ArtifactRepositoryError::UnknownSourceTasks(_)) => {
                ErrorKind::Validation
            }
            Self::Repository(
                ArtifactRepositoryError::ArtifactNotFound(_)
                | ArtifactRepositoryError::VersionNotFound(_),
            ) => ErrorKind::NotFound,
            Self::Repository(ArtifactRepositoryError::Unavailable(_)) => ErrorKind::Unavailable,
            Self::Repository(ArtifactRepositoryError::Persistence(_)) | Self::Render { .. } => {
                ErrorKind::Internal
            }
        }
    }
}

/// Result type for artifact service operations.
pub type ArtifactServiceResult<T> = Result<T, ArtifactServiceError>;

/// Artifact orchestration service.
#[derive(Clone)]
pub struct ArtifactService<R, C>
where
    R: ArtifactRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> ArtifactService<R, C>
where
    R: ArtifactRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new artifact service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Validates the request, appends a new version, and attaches sources.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactServiceError::Domain`] for blank or unknown input and
    /// [`ArtifactServiceError::Repository`] when the target artifact or a
    /// source task does not exist.
    pub async fn save_artifact_with_version(
        &self,
        request: SaveArtifactRequest,
    ) -> ArtifactServiceResult<ArtifactSnapshot> {
        let payload = request.into_payload(&*self.clock)?;
        Ok(self.repository.save_with_version(&payload).await?)
    }

    /// Returns the latest snapshot of every artifact.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactServiceError::Repository`] when the store fails.
    pub async fn list_latest_artifacts(&self) -> ArtifactServiceResult<Vec<ArtifactSnapshot>> {
        Ok(self.repository.list_latest().await?)
    }

    /// Returns the latest snapshot of one artifact.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactRepositoryError::ArtifactNotFound`] (wrapped) when
    /// the artifact does not exist.
    pub async fn get_latest_artifact_snapshot(
        &self,
        artifact_id: ArtifactId,
    ) -> ArtifactServiceResult<ArtifactSnapshot> {
        self.repository
            .find_latest(artifact_id)
            .await?
            .ok_or(ArtifactServiceError::Repository(
                ArtifactRepositoryError::ArtifactNotFound(artifact_id),
            ))
    }

    /// Returns the full version history of an artifact, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactServiceError::Repository`] when the artifact does
    /// not exist.
    pub async fn artifact_versions(
        &self,
        artifact_id: ArtifactId,
    ) -> ArtifactServiceResult<Vec<ArtifactVersion>> {
        Ok(self.repository.list_versions(artifact_id).await?)
    }

    /// Attaches task and message sources. Non-positive ids are ignored; with
    /// no usable ids the manual fallback applies.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactRepositoryError::UnknownSourceTasks`] (wrapped),
    /// naming every missing task, when any task does not exist.
    pub async fn attach_sources(
        &self,
        artifact_id: ArtifactId,
        task_ids: &[i64],
        message_ids: &[i64],
    ) -> ArtifactServiceResult<usize> {
        let refs = SourceRefs::from_raw(task_ids, message_ids);
        Ok(self
            .repository
            .attach_sources(artifact_id, &refs, self.clock.utc())
            .await?)
    }

    /// Returns the sources of an artifact.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactServiceError::Repository`] when the artifact does
    /// not exist.
    pub async fn artifact_sources(
        &self,
        artifact_id: ArtifactId,
    ) -> ArtifactServiceResult<Vec<ArtifactSource>> {
        Ok(self.repository.list_sources(artifact_id).await?)
    }

    /// Attaches an export to a version.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactDomainError::MissingExportPayload`] (wrapped) when
    /// both content and location are blank, and
    /// [`ArtifactRepositoryError::VersionNotFound`] (wrapped) when the
    /// version does not exist.
    pub async fn add_artifact_export(
        &self,
        request: AddExportRequest,
    ) -> ArtifactServiceResult<ExportId> {
        let payload = ExportPayload::new(request.content, request.location)?;
        let format = ExportFormat::try_from(request.format.as_str())?;
        let export = NewExport::new(request.version_id, format, payload, &*self.clock);
        Ok(self.repository.add_export(&export).await?)
    }

    /// Returns the exports of a version.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactServiceError::Repository`] when the version does not
    /// exist.
    pub async fn version_exports(
        &self,
        version_id: VersionId,
    ) -> ArtifactServiceResult<Vec<ArtifactExport>> {
        Ok(self.repository.list_exports(version_id).await?)
    }

    /// Renders the latest version as markdown and stores it as an inline
    /// `markdown` export of that version.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactServiceError::Repository`] when the artifact does not
    /// exist and [`ArtifactServiceError::Render`] when rendering fails.
    pub async fn export_latest_as_markdown(
        &self,
        artifact_id: ArtifactId,
    ) -> ArtifactServiceResult<ArtifactExport> {
        let snapshot = self.get_latest_artifact_snapshot(artifact_id).await?;
        let markdown =
            render_markdown(&snapshot).map_err(|err| ArtifactServiceError::Render {
                artifact_id,
                reason: err.to_string(),
            })?;
        let payload = ExportPayload::new(Some(markdown), None)?;
        let export = NewExport::new(
            snapshot.version_id,
            ExportFormat::Markdown,
            payload,
            &*self.clock,
        );
        let id = self.repository.add_export(&export).await?;
        debug!(%artifact_id, version = snapshot.version, "exported artifact as markdown");

        Ok(ArtifactExport {
            id,
            version_id: export.version_id(),
            format: export.format(),
            content: export.payload().content().map(ToOwned::to_owned),
            location: None,
            created_at: export.created_at(),
        })
    }
}
