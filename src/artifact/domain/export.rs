//! Rendered exports of a single artifact version.

use super::{ArtifactDomainError, ExportFormat, ExportId, VersionId};
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Inline content and external location of an export. At least one is
/// present and neither is blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    content: Option<String>,
    location: Option<String>,
}

impl ExportPayload {
    /// Trims both parts and drops blank ones.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactDomainError::MissingExportPayload`] when both parts
    /// are absent or blank.
    pub fn new(
        content: Option<String>,
        location: Option<String>,
    ) -> Result<Self, ArtifactDomainError> {
        let payload = Self {
            content: content.and_then(non_blank),
            location: location.and_then(non_blank),
        };
        if payload.content.is_none() && payload.location.is_none() {
            return Err(ArtifactDomainError::MissingExportPayload);
        }
        Ok(payload)
    }

    /// Returns the inline content, if any.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Returns the external location, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_owned())
    }
}

/// Validated export ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExport {
    version_id: VersionId,
    format: ExportFormat,
    payload: ExportPayload,
    created_at: DateTime<Utc>,
}

impl NewExport {
    /// Creates an export of `version_id`, timestamped at the precision the
    /// store keeps.
    #[must_use]
    pub fn new(
        version_id: VersionId,
        format: ExportFormat,
        payload: ExportPayload,
        clock: &impl Clock,
    ) -> Self {
        Self {
            version_id,
            format,
            payload,
            created_at: clock.utc().trunc_subsecs(6),
        }
    }

    /// Returns the exported version.
    #[must_use]
    pub const fn version_id(&self) -> VersionId {
        self.version_id
    }

    /// Returns the export format.
    #[must_use]
    pub const fn format(&self) -> ExportFormat {
        self.format
    }

    /// Returns the payload.
    #[must_use]
    pub const fn payload(&self) -> &ExportPayload {
        &self.payload
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Stored export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactExport {
    /// Export identifier.
    pub id: ExportId,
    /// Exported version.
    pub version_id: VersionId,
    /// Export format.
    pub format: ExportFormat,
    /// Inline content, if stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// External location, if stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// When the export was recorded.
    pub created_at: DateTime<Utc>,
}
