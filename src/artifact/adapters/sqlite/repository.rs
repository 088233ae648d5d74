//! SQLite repository implementation for artifact storage.

use super::{
    exports,
    models::{ArtifactChangeset, ArtifactRow, NewArtifactRow, NewVersionRow, SnapshotRow, VersionRow},
    snapshots, sources,
};
use crate::artifact::{
    domain::{
        ArtifactExport, ArtifactId, ArtifactSnapshot, ArtifactSource, ArtifactVersion, ExportId,
        NewArtifactVersion, NewExport, SourceRefs, VersionId,
    },
    ports::{ArtifactRepository, ArtifactRepositoryError, ArtifactRepositoryResult},
};
use crate::persistence::schema::{artifact_versions, artifacts};
use crate::persistence::{Database, timestamp};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::debug;

/// SQLite-backed artifact repository.
#[derive(Debug, Clone)]
pub struct SqliteArtifactRepository {
    database: Database,
}

impl SqliteArtifactRepository {
    /// Creates a repository over the shared store.
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl ArtifactRepository for SqliteArtifactRepository {
    async fn save_with_version(
        &self,
        payload: &NewArtifactVersion,
    ) -> ArtifactRepositoryResult<ArtifactSnapshot> {
        let save = payload.clone();
        self.database
            .run_blocking(move |connection| {
                connection.immediate_transaction(|tx| save_in_transaction(tx, &save))
            })
            .await
    }

    async fn list_latest(&self) -> ArtifactRepositoryResult<Vec<ArtifactSnapshot>> {
        self.database.run_blocking(snapshots::list_latest).await
    }

    async fn find_latest(
        &self,
        artifact_id: ArtifactId,
    ) -> ArtifactRepositoryResult<Option<ArtifactSnapshot>> {
        self.database
            .run_blocking(move |connection| snapshots::find_latest(connection, artifact_id))
            .await
    }

    async fn list_versions(
        &self,
        artifact_id: ArtifactId,
    ) -> ArtifactRepositoryResult<Vec<ArtifactVersion>> {
        self.database
            .run_blocking(move |connection| {
                connection.transaction(|tx| {
                    ensure_artifact_exists(tx, artifact_id)?;
                    artifact_versions::table
                        .filter(artifact_versions::artifact_id.eq(artifact_id.value()))
                        .order(artifact_versions::version.asc())
                        .select(VersionRow::as_select())
                        .load::<VersionRow>(tx)?
                        .into_iter()
                        .map(VersionRow::into_version)
                        .collect()
                })
            })
            .await
    }

    async fn attach_sources(
        &self,
        artifact_id: ArtifactId,
        sources: &SourceRefs,
        attached_at: DateTime<Utc>,
    ) -> ArtifactRepositoryResult<usize> {
        let refs = sources.clone();
        self.database
            .run_blocking(move |connection| {
                connection.immediate_transaction(|tx| {
                    ensure_artifact_exists(tx, artifact_id)?;
                    sources::attach(tx, artifact_id, &refs, attached_at)
                })
            })
            .await
    }

    async fn list_sources(
        &self,
        artifact_id: ArtifactId,
    ) -> ArtifactRepositoryResult<Vec<ArtifactSource>> {
        self.database
            .run_blocking(move |connection| {
                connection.transaction(|tx| {
                    ensure_artifact_exists(tx, artifact_id)?;
                    sources::list(tx, artifact_id)
                })
            })
            .await
    }

    async fn add_export(&self, export: &NewExport) -> ArtifactRepositoryResult<ExportId> {
        let new_export = export.clone();
        self.database
            .run_blocking(move |connection| {
                connection.immediate_transaction(|tx| exports::add(tx, &new_export))
            })
            .await
    }

    async fn list_exports(
        &self,
        version_id: VersionId,
    ) -> ArtifactRepositoryResult<Vec<ArtifactExport>> {
        self.database
            .run_blocking(move |connection| {
                connection.transaction(|tx| exports::list(tx, version_id))
            })
            .await
    }
}

fn ensure_artifact_exists(
    connection: &mut SqliteConnection,
    artifact_id: ArtifactId,
) -> ArtifactRepositoryResult<()> {
    let exists = diesel::select(diesel::dsl::exists(
        artifacts::table.find(artifact_id.value()),
    ))
    .get_result::<bool>(connection)?;
    if exists {
        Ok(())
    } else {
        Err(ArtifactRepositoryError::ArtifactNotFound(artifact_id))
    }
}

/// Upserts the artifact, appends `max(version) + 1`, and attaches sources.
fn save_in_transaction(
    connection: &mut SqliteConnection,
    payload: &NewArtifactVersion,
) -> ArtifactRepositoryResult<ArtifactSnapshot> {
    let artifact = match payload.artifact_id() {
        Some(artifact_id) => diesel::update(artifacts::table.find(artifact_id.value()))
            .set(ArtifactChangeset::from(payload))
            .returning(ArtifactRow::as_returning())
            .get_result::<ArtifactRow>(connection)
            .optional()?
            .ok_or(ArtifactRepositoryError::ArtifactNotFound(artifact_id))?,
        None => diesel::insert_into(artifacts::table)
            .values(NewArtifactRow::from(payload))
            .returning(ArtifactRow::as_returning())
            .get_result::<ArtifactRow>(connection)?,
    };

    let latest = artifact_versions::table
        .filter(artifact_versions::artifact_id.eq(artifact.id))
        .select(diesel::dsl::max(artifact_versions::version))
        .get_result::<Option<i64>>(connection)?;
    let version = diesel::insert_into(artifact_versions::table)
        .values(NewVersionRow {
            artifact_id: artifact.id,
            version: latest.unwrap_or(0).saturating_add(1),
            format: payload.format().as_str(),
            content: payload.content(),
            render_url: payload.render_url(),
            notes: payload.notes(),
            created_at: timestamp::encode(payload.created_at()),
        })
        .returning(VersionRow::as_returning())
        .get_result::<VersionRow>(connection)?;
    debug!(
        artifact_id = artifact.id,
        version = version.version,
        "appended artifact version"
    );

    sources::attach(
        connection,
        ArtifactId::new(artifact.id),
        payload.sources(),
        payload.created_at(),
    )?;
    SnapshotRow::from_parts(artifact, version).into_snapshot()
}
