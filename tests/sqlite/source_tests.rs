//! Provenance attachment against SQLite.

use atelier::ErrorKind;
use atelier::artifact::{
    domain::{ArtifactId, ArtifactSource, MANUAL_SOURCE_DESCRIPTION, MessageId, SourceOrigin},
    services::SaveArtifactRequest,
};
use eyre::Result;
use rstest::rstest;

use crate::sqlite::helpers::{StoreContext, store};

fn origins(sources: &[ArtifactSource]) -> Vec<SourceOrigin> {
    sources.iter().map(|source| source.origin.clone()).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn save_without_sources_records_the_manual_fallback_once(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;
    let snapshot = ctx.document("Notes", "body").await?;

    let added_empty = ctx
        .artifacts
        .attach_sources(snapshot.artifact_id, &[], &[])
        .await?;
    let added_filtered = ctx
        .artifacts
        .attach_sources(snapshot.artifact_id, &[0, -3], &[-1])
        .await?;
    let sources = ctx.artifacts.artifact_sources(snapshot.artifact_id).await?;

    assert_eq!(added_empty, 0);
    assert_eq!(added_filtered, 0);
    assert_eq!(
        origins(&sources),
        vec![SourceOrigin::Manual {
            description: MANUAL_SOURCE_DESCRIPTION.to_owned()
        }]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_save_without_sources_adds_no_manual_row(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;
    let first = ctx.document("Notes", "v1").await?;

    ctx.artifacts
        .save_artifact_with_version(
            SaveArtifactRequest::new("Notes", "text", "requirements", "v2")
                .for_artifact(first.artifact_id),
        )
        .await?;
    let sources = ctx.artifacts.artifact_sources(first.artifact_id).await?;

    assert_eq!(sources.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn save_with_sources_links_tasks_and_messages(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;
    let ids = ctx.create_tasks(2).await?;

    let snapshot = ctx
        .artifacts
        .save_artifact_with_version(
            SaveArtifactRequest::new("Spec", "text", "requirements", "body")
                .with_task_ids([ids[1].value(), ids[0].value(), ids[1].value()])
                .with_message_ids([17]),
        )
        .await?;
    let sources = ctx.artifacts.artifact_sources(snapshot.artifact_id).await?;

    assert_eq!(
        origins(&sources),
        vec![
            SourceOrigin::Task { task_id: ids[0] },
            SourceOrigin::Task { task_id: ids[1] },
            SourceOrigin::Message {
                message_id: MessageId::new(17)
            },
        ]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reattaching_a_source_is_idempotent(#[future] store: Result<StoreContext>) -> Result<()> {
    let ctx = store.await?;
    let ids = ctx.create_tasks(1).await?;
    let snapshot = ctx.document("Plan", "body").await?;

    let first = ctx
        .artifacts
        .attach_sources(snapshot.artifact_id, &[ids[0].value()], &[5])
        .await?;
    let second = ctx
        .artifacts
        .attach_sources(snapshot.artifact_id, &[ids[0].value()], &[5])
        .await?;
    let sources = ctx.artifacts.artifact_sources(snapshot.artifact_id).await?;

    assert_eq!(first, 2);
    assert_eq!(second, 0);
    assert_eq!(sources.len(), 3);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_source_tasks_are_named_and_nothing_is_attached(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;
    let ids = ctx.create_tasks(1).await?;
    let snapshot = ctx.document("Plan", "body").await?;

    let err = ctx
        .artifacts
        .attach_sources(snapshot.artifact_id, &[ids[0].value(), 88, 77], &[])
        .await
        .expect_err("unknown tasks");
    let sources = ctx.artifacts.artifact_sources(snapshot.artifact_id).await?;

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("77, 88"));
    assert_eq!(sources.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn save_with_unknown_source_task_stores_no_artifact(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;

    let err = ctx
        .artifacts
        .save_artifact_with_version(
            SaveArtifactRequest::new("Spec", "text", "requirements", "body").with_task_ids([12]),
        )
        .await
        .expect_err("unknown task");

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(ctx.artifacts.list_latest_artifacts().await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sources_of_a_missing_artifact_are_not_found(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;

    let listed = ctx.artifacts.artifact_sources(ArtifactId::new(8)).await;
    let attached = ctx.artifacts.attach_sources(ArtifactId::new(8), &[], &[]).await;

    assert_eq!(listed.expect_err("missing").kind(), ErrorKind::NotFound);
    assert_eq!(attached.expect_err("missing").kind(), ErrorKind::NotFound);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_source_task_keeps_the_provenance_row(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;
    let ids = ctx.create_tasks(1).await?;
    let snapshot = ctx
        .artifacts
        .save_artifact_with_version(
            SaveArtifactRequest::new("Spec", "text", "requirements", "body")
                .with_task_ids([ids[0].value()]),
        )
        .await?;

    ctx.tasks.delete(ids[0]).await?;
    let sources = ctx.artifacts.artifact_sources(snapshot.artifact_id).await?;

    assert_eq!(
        origins(&sources),
        vec![SourceOrigin::Task { task_id: ids[0] }]
    );
    Ok(())
}
