//! Export rows attached to artifact versions.

use super::models::{ExportRow, NewExportRow};
use crate::artifact::{
    domain::{ArtifactExport, ExportId, NewExport, VersionId},
    ports::{ArtifactRepositoryError, ArtifactRepositoryResult},
};
use crate::persistence::schema::{artifact_exports, artifact_versions};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::debug;

pub(super) fn ensure_version_exists(
    connection: &mut SqliteConnection,
    version_id: VersionId,
) -> ArtifactRepositoryResult<()> {
    let exists = diesel::select(diesel::dsl::exists(
        artifact_versions::table.find(version_id.value()),
    ))
    .get_result::<bool>(connection)?;
    if exists {
        Ok(())
    } else {
        Err(ArtifactRepositoryError::VersionNotFound(version_id))
    }
}

pub(super) fn add(
    connection: &mut SqliteConnection,
    export: &NewExport,
) -> ArtifactRepositoryResult<ExportId> {
    ensure_version_exists(connection, export.version_id())?;
    let id = diesel::insert_into(artifact_exports::table)
        .values(NewExportRow::from(export))
        .returning(artifact_exports::id)
        .get_result::<i64>(connection)?;
    debug!(
        export_id = id,
        version_id = %export.version_id(),
        format = export.format().as_str(),
        "stored artifact export"
    );
    Ok(ExportId::new(id))
}

pub(super) fn list(
    connection: &mut SqliteConnection,
    version_id: VersionId,
) -> ArtifactRepositoryResult<Vec<ArtifactExport>> {
    ensure_version_exists(connection, version_id)?;
    artifact_exports::table
        .filter(artifact_exports::artifact_version_id.eq(version_id.value()))
        .order((artifact_exports::created_at.asc(), artifact_exports::id.asc()))
        .select(ExportRow::as_select())
        .load::<ExportRow>(connection)?
        .into_iter()
        .map(ExportRow::into_export)
        .collect()
}
