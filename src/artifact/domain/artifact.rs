//! Save payload, version history entries, and latest snapshots.

use super::{
    ArtifactCategory, ArtifactDomainError, ArtifactId, ArtifactKind, SourceRefs, VersionFormat,
    VersionId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated input for one save: the artifact fields, the content of the
/// version to append, and the sources to attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArtifactVersion {
    artifact_id: Option<ArtifactId>,
    title: String,
    kind: ArtifactKind,
    category: ArtifactCategory,
    format: VersionFormat,
    content: String,
    render_url: Option<String>,
    notes: Option<String>,
    sources: SourceRefs,
    created_at: DateTime<Utc>,
}

impl NewArtifactVersion {
    /// Creates a payload for a new artifact. The format defaults to the
    /// kind's natural format.
    ///
    /// The title is trimmed; the content is stored exactly as given.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactDomainError::EmptyTitle`] or
    /// [`ArtifactDomainError::EmptyContent`] when either is blank.
    pub fn new(
        title: impl Into<String>,
        kind: ArtifactKind,
        category: ArtifactCategory,
        content: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, ArtifactDomainError> {
        let raw_title = title.into();
        let trimmed_title = raw_title.trim();
        if trimmed_title.is_empty() {
            return Err(ArtifactDomainError::EmptyTitle);
        }
        let body = content.into();
        if body.trim().is_empty() {
            return Err(ArtifactDomainError::EmptyContent);
        }

        Ok(Self {
            artifact_id: None,
            title: trimmed_title.to_owned(),
            kind,
            category,
            format: VersionFormat::default_for(kind),
            content: body,
            render_url: None,
            notes: None,
            sources: SourceRefs::new(),
            created_at: clock.utc(),
        })
    }

    /// Targets an existing artifact instead of creating one.
    #[must_use]
    pub const fn with_artifact_id(mut self, artifact_id: ArtifactId) -> Self {
        self.artifact_id = Some(artifact_id);
        self
    }

    /// Overrides the version format.
    #[must_use]
    pub const fn with_format(mut self, format: VersionFormat) -> Self {
        self.format = format;
        self
    }

    /// Records where a rendering of this version can be fetched. Blank
    /// values are ignored.
    #[must_use]
    pub fn with_render_url(mut self, render_url: impl Into<String>) -> Self {
        self.render_url = optional_text(render_url.into());
        self
    }

    /// Attaches a free-form note. Blank values are ignored.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = optional_text(notes.into());
        self
    }

    /// Sets the sources to attach after the version is appended.
    #[must_use]
    pub fn with_sources(mut self, sources: SourceRefs) -> Self {
        self.sources = sources;
        self
    }

    /// Returns the targeted artifact, if updating one.
    #[must_use]
    pub const fn artifact_id(&self) -> Option<ArtifactId> {
        self.artifact_id
    }

    /// Returns the trimmed title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the kind.
    #[must_use]
    pub const fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Returns the category.
    #[must_use]
    pub const fn category(&self) -> ArtifactCategory {
        self.category
    }

    /// Returns the version format.
    #[must_use]
    pub const fn format(&self) -> VersionFormat {
        self.format
    }

    /// Returns the content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the render location, if any.
    #[must_use]
    pub fn render_url(&self) -> Option<&str> {
        self.render_url.as_deref()
    }

    /// Returns the note, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the sources to attach.
    #[must_use]
    pub const fn sources(&self) -> &SourceRefs {
        &self.sources
    }

    /// Returns the save timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn optional_text(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// One immutable entry of an artifact's version history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactVersion {
    /// Version row identifier.
    pub id: VersionId,
    /// Owning artifact.
    pub artifact_id: ArtifactId,
    /// Version number, starting at 1.
    pub version: i64,
    /// Content format.
    pub format: VersionFormat,
    /// Content as saved.
    pub content: String,
    /// Render location, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_url: Option<String>,
    /// Note, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// When the version was appended.
    pub created_at: DateTime<Utc>,
}

/// An artifact joined with its latest version.
///
/// `created_at` is when the artifact was first saved and `updated_at` when
/// the shown version was appended. The category serialises in its external
/// spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSnapshot {
    /// Artifact identifier.
    pub artifact_id: ArtifactId,
    /// Identifier of the shown version.
    pub version_id: VersionId,
    /// Current title.
    pub title: String,
    /// Current kind.
    pub kind: ArtifactKind,
    /// Current category.
    pub category: ArtifactCategory,
    /// Number of the shown version.
    pub version: i64,
    /// Content format of the shown version.
    pub format: VersionFormat,
    /// Content of the shown version.
    pub content: String,
    /// Render location of the shown version, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_url: Option<String>,
    /// Note on the shown version, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// When the artifact was first saved.
    pub created_at: DateTime<Utc>,
    /// When the shown version was appended.
    pub updated_at: DateTime<Utc>,
}
