//! Latest-version projection queries.

use super::models::SnapshotRow;
use crate::artifact::{
    domain::{ArtifactId, ArtifactSnapshot},
    ports::ArtifactRepositoryResult,
};
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel::sqlite::SqliteConnection;

/// Joins each artifact to its highest version, newest row first on ties.
const LATEST_SNAPSHOT_SELECT: &str = concat!(
    "SELECT a.id AS artifact_id, v.id AS version_id, a.title, a.kind, a.category, ",
    "v.version, v.format, v.content, v.render_url, v.notes, ",
    "a.created_at, v.created_at AS updated_at ",
    "FROM artifacts AS a ",
    "JOIN artifact_versions AS v ON v.id = (",
    "SELECT latest.id FROM artifact_versions AS latest ",
    "WHERE latest.artifact_id = a.id ",
    "ORDER BY latest.version DESC, latest.created_at DESC, latest.id DESC ",
    "LIMIT 1) ",
);

pub(super) fn list_latest(
    connection: &mut SqliteConnection,
) -> ArtifactRepositoryResult<Vec<ArtifactSnapshot>> {
    diesel::sql_query(format!("{LATEST_SNAPSHOT_SELECT}ORDER BY a.id"))
        .load::<SnapshotRow>(connection)?
        .into_iter()
        .map(SnapshotRow::into_snapshot)
        .collect()
}

pub(super) fn find_latest(
    connection: &mut SqliteConnection,
    artifact_id: ArtifactId,
) -> ArtifactRepositoryResult<Option<ArtifactSnapshot>> {
    diesel::sql_query(format!("{LATEST_SNAPSHOT_SELECT}WHERE a.id = ?"))
        .bind::<BigInt, _>(artifact_id.value())
        .get_result::<SnapshotRow>(connection)
        .optional()?
        .map(SnapshotRow::into_snapshot)
        .transpose()
}
