//! Provenance attachment with the manual fallback.

use super::models::{NewSourceRow, SourceRow};
use crate::artifact::{
    domain::{ArtifactId, ArtifactSource, MANUAL_SOURCE_DESCRIPTION, SourceRefs, SourceType},
    ports::{ArtifactRepositoryError, ArtifactRepositoryResult},
};
use crate::persistence::{schema::artifact_sources, timestamp};
use crate::task::{adapters::sqlite::missing_task_ids, domain::TaskId};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::debug;

/// Attaches `sources` to an artifact. Runs inside the caller's transaction
/// and checks every task before inserting anything.
///
/// Re-attaching an existing source is a no-op. With no sources, a single
/// manual source is added unless the artifact already has one or more
/// sources of any type.
pub(super) fn attach(
    connection: &mut SqliteConnection,
    artifact_id: ArtifactId,
    sources: &SourceRefs,
    attached_at: DateTime<Utc>,
) -> ArtifactRepositoryResult<usize> {
    let task_ids: Vec<i64> = sources.tasks().iter().map(|id| id.value()).collect();
    let missing = missing_task_ids(connection, &task_ids)?;
    if !missing.is_empty() {
        return Err(ArtifactRepositoryError::UnknownSourceTasks(
            missing.into_iter().map(TaskId::new).collect(),
        ));
    }

    let encoded = timestamp::encode(attached_at);
    let created_at = encoded.as_str();
    let row = move |source_type: SourceType, source_id: Option<i64>| NewSourceRow {
        artifact_id: artifact_id.value(),
        source_type: source_type.as_str(),
        source_id,
        description: source_id.is_none().then_some(MANUAL_SOURCE_DESCRIPTION),
        created_at,
    };

    if sources.is_empty() {
        let existing = artifact_sources::table
            .filter(artifact_sources::artifact_id.eq(artifact_id.value()))
            .count()
            .get_result::<i64>(connection)?;
        if existing > 0 {
            return Ok(0);
        }
        let added = insert_source(connection, &row(SourceType::Manual, None))?;
        debug!(%artifact_id, "attached manual source fallback");
        return Ok(added);
    }

    let mut added = 0;
    for task in sources.tasks() {
        added += insert_source(connection, &row(SourceType::Task, Some(task.value())))?;
    }
    for message in sources.messages() {
        added += insert_source(connection, &row(SourceType::Message, Some(message.value())))?;
    }
    debug!(%artifact_id, added, "attached artifact sources");
    Ok(added)
}

fn insert_source(connection: &mut SqliteConnection, row: &NewSourceRow<'_>) -> QueryResult<usize> {
    diesel::insert_or_ignore_into(artifact_sources::table)
        .values(row)
        .execute(connection)
}

pub(super) fn list(
    connection: &mut SqliteConnection,
    artifact_id: ArtifactId,
) -> ArtifactRepositoryResult<Vec<ArtifactSource>> {
    artifact_sources::table
        .filter(artifact_sources::artifact_id.eq(artifact_id.value()))
        .order(artifact_sources::id.asc())
        .select(SourceRow::as_select())
        .load::<SourceRow>(connection)?
        .into_iter()
        .map(SourceRow::into_source)
        .collect()
}
