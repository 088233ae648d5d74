//! Diesel row models for artifact persistence.

use crate::artifact::{
    domain::{
        ArtifactExport, ArtifactId, ArtifactKind, ArtifactSnapshot, ArtifactSource,
        ArtifactVersion, ExportFormat, ExportId, MessageId, NewArtifactVersion, NewExport,
        SourceOrigin, SourceType, VersionFormat, VersionId, normalize_category,
    },
    ports::{ArtifactRepositoryError, ArtifactRepositoryResult},
};
use crate::persistence::schema::{artifact_exports, artifact_sources, artifact_versions, artifacts};
use crate::persistence::timestamp;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable, Text};

fn decode_time(value: &str) -> ArtifactRepositoryResult<DateTime<Utc>> {
    timestamp::decode(value).map_err(ArtifactRepositoryError::persistence)
}

/// Query result row for artifact records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = artifacts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(super) struct ArtifactRow {
    pub id: i64,
    pub title: String,
    pub kind: String,
    pub category: String,
    pub created_at: String,
}

/// Insert model for artifact records.
#[derive(Debug, Insertable)]
#[diesel(table_name = artifacts)]
pub(super) struct NewArtifactRow<'a> {
    pub title: &'a str,
    pub kind: &'static str,
    pub category: &'static str,
    pub created_at: String,
}

impl<'a> From<&'a NewArtifactVersion> for NewArtifactRow<'a> {
    fn from(payload: &'a NewArtifactVersion) -> Self {
        Self {
            title: payload.title(),
            kind: payload.kind().as_str(),
            category: payload.category().as_str(),
            created_at: timestamp::encode(payload.created_at()),
        }
    }
}

/// In-place overwrite of an existing artifact's descriptive fields.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = artifacts)]
pub(super) struct ArtifactChangeset<'a> {
    pub title: &'a str,
    pub kind: &'static str,
    pub category: &'static str,
}

impl<'a> From<&'a NewArtifactVersion> for ArtifactChangeset<'a> {
    fn from(payload: &'a NewArtifactVersion) -> Self {
        Self {
            title: payload.title(),
            kind: payload.kind().as_str(),
            category: payload.category().as_str(),
        }
    }
}

/// Query result row for version records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = artifact_versions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(super) struct VersionRow {
    pub id: i64,
    pub artifact_id: i64,
    pub version: i64,
    pub format: String,
    pub content: String,
    pub render_url: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

impl VersionRow {
    pub(super) fn into_version(self) -> ArtifactRepositoryResult<ArtifactVersion> {
        Ok(ArtifactVersion {
            id: VersionId::new(self.id),
            artifact_id: ArtifactId::new(self.artifact_id),
            version: self.version,
            format: VersionFormat::try_from(self.format.as_str())
                .map_err(ArtifactRepositoryError::persistence)?,
            created_at: decode_time(&self.created_at)?,
            content: self.content,
            render_url: self.render_url,
            notes: self.notes,
        })
    }
}

/// Insert model for version records.
#[derive(Debug, Insertable)]
#[diesel(table_name = artifact_versions)]
pub(super) struct NewVersionRow<'a> {
    pub artifact_id: i64,
    pub version: i64,
    pub format: &'static str,
    pub content: &'a str,
    pub render_url: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub created_at: String,
}

/// Query result row for source records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = artifact_sources)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(super) struct SourceRow {
    pub artifact_id: i64,
    pub source_type: String,
    pub source_id: Option<i64>,
    pub description: Option<String>,
    pub created_at: String,
}

impl SourceRow {
    pub(super) fn into_source(self) -> ArtifactRepositoryResult<ArtifactSource> {
        let source_type = SourceType::try_from(self.source_type.as_str())
            .map_err(ArtifactRepositoryError::persistence)?;
        let origin = match (source_type, self.source_id) {
            (SourceType::Task, Some(id)) => SourceOrigin::Task {
                task_id: TaskId::new(id),
            },
            (SourceType::Message, Some(id)) => SourceOrigin::Message {
                message_id: MessageId::new(id),
            },
            (SourceType::Manual, None) => SourceOrigin::Manual {
                description: self.description.unwrap_or_default(),
            },
            _ => {
                return Err(ArtifactRepositoryError::persistence(
                    diesel::result::Error::DeserializationError(
                        format!(
                            "source type {} is inconsistent with its source id",
                            source_type.as_str()
                        )
                        .into(),
                    ),
                ));
            }
        };
        Ok(ArtifactSource {
            artifact_id: ArtifactId::new(self.artifact_id),
            origin,
            created_at: decode_time(&self.created_at)?,
        })
    }
}

/// Insert model for source records.
#[derive(Debug, Insertable)]
#[diesel(table_name = artifact_sources)]
pub(super) struct NewSourceRow<'a> {
    pub artifact_id: i64,
    pub source_type: &'static str,
    pub source_id: Option<i64>,
    pub description: Option<&'a str>,
    pub created_at: &'a str,
}

/// Query result row for export records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = artifact_exports)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(super) struct ExportRow {
    pub id: i64,
    pub artifact_version_id: i64,
    pub format: String,
    pub content: Option<String>,
    pub location: Option<String>,
    pub created_at: String,
}

impl ExportRow {
    pub(super) fn into_export(self) -> ArtifactRepositoryResult<ArtifactExport> {
        Ok(ArtifactExport {
            id: ExportId::new(self.id),
            version_id: VersionId::new(self.artifact_version_id),
            format: ExportFormat::try_from(self.format.as_str())
                .map_err(ArtifactRepositoryError::persistence)?,
            created_at: decode_time(&self.created_at)?,
            content: self.content,
            location: self.location,
        })
    }
}

/// Insert model for export records.
#[derive(Debug, Insertable)]
#[diesel(table_name = artifact_exports)]
pub(super) struct NewExportRow<'a> {
    pub artifact_version_id: i64,
    pub format: &'static str,
    pub content: Option<&'a str>,
    pub location: Option<&'a str>,
    pub created_at: String,
}

impl<'a> From<&'a NewExport> for NewExportRow<'a> {
    fn from(export: &'a NewExport) -> Self {
        Self {
            artifact_version_id: export.version_id().value(),
            format: export.format().as_str(),
            content: export.payload().content(),
            location: export.payload().location(),
            created_at: timestamp::encode(export.created_at()),
        }
    }
}

/// Artifact fields joined with one version, as read by the latest-version
/// queries.
#[derive(Debug, Clone, QueryableByName)]
pub(super) struct SnapshotRow {
    #[diesel(sql_type = BigInt)]
    pub artifact_id: i64,
    #[diesel(sql_type = BigInt)]
    pub version_id: i64,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = Text)]
    pub kind: String,
    #[diesel(sql_type = Text)]
    pub category: String,
    #[diesel(sql_type = BigInt)]
    pub version: i64,
    #[diesel(sql_type = Text)]
    pub format: String,
    #[diesel(sql_type = Text)]
    pub content: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub render_url: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub notes: Option<String>,
    #[diesel(sql_type = Text)]
    pub created_at: String,
    #[diesel(sql_type = Text)]
    pub updated_at: String,
}

impl SnapshotRow {
    /// Combines an artifact row with the version just written to it.
    pub(super) fn from_parts(artifact: ArtifactRow, version: VersionRow) -> Self {
        Self {
            artifact_id: artifact.id,
            version_id: version.id,
            title: artifact.title,
            kind: artifact.kind,
            category: artifact.category,
            version: version.version,
            format: version.format,
            content: version.content,
            render_url: version.render_url,
            notes: version.notes,
            created_at: artifact.created_at,
            updated_at: version.created_at,
        }
    }

    pub(super) fn into_snapshot(self) -> ArtifactRepositoryResult<ArtifactSnapshot> {
        Ok(ArtifactSnapshot {
            artifact_id: ArtifactId::new(self.artifact_id),
            version_id: VersionId::new(self.version_id),
            kind: ArtifactKind::try_from(self.kind.as_str())
                .map_err(ArtifactRepositoryError::persistence)?,
            category: normalize_category(&self.category)
                .map_err(ArtifactRepositoryError::persistence)?,
            format: VersionFormat::try_from(self.format.as_str())
                .map_err(ArtifactRepositoryError::persistence)?,
            created_at: decode_time(&self.created_at)?,
            updated_at: decode_time(&self.updated_at)?,
            title: self.title,
            version: self.version,
            content: self.content,
            render_url: self.render_url,
            notes: self.notes,
        })
    }
}
