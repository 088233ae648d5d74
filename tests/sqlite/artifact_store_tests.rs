//! Append-only artifact versioning against SQLite.

use atelier::ErrorKind;
use atelier::artifact::{
    domain::{ArtifactCategory, ArtifactId, ArtifactKind, VersionFormat},
    services::SaveArtifactRequest,
};
use eyre::Result;
use rstest::rstest;

use crate::sqlite::helpers::{StoreContext, store};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn first_save_creates_version_one(#[future] store: Result<StoreContext>) -> Result<()> {
    let ctx = store.await?;

    let snapshot = ctx
        .artifacts
        .save_artifact_with_version(
            SaveArtifactRequest::new("Login flow", "diagram", "Sequence Diagram", "@startuml\n@enduml")
                .with_notes("first draft"),
        )
        .await?;

    assert_eq!(snapshot.version, 1);
    assert_eq!(snapshot.kind, ArtifactKind::Diagram);
    assert_eq!(snapshot.category, ArtifactCategory::Sequence);
    assert_eq!(snapshot.format, VersionFormat::Plantuml);
    assert_eq!(snapshot.notes.as_deref(), Some("first draft"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn saving_again_appends_a_version(#[future] store: Result<StoreContext>) -> Result<()> {
    let ctx = store.await?;
    let first = ctx.document("Requirements", "v1 body").await?;

    let second = ctx
        .artifacts
        .save_artifact_with_version(
            SaveArtifactRequest::new("Requirements v2", "text", "srs", "v2 body")
                .for_artifact(first.artifact_id),
        )
        .await?;
    let latest = ctx
        .artifacts
        .get_latest_artifact_snapshot(first.artifact_id)
        .await?;
    let versions = ctx.artifacts.artifact_versions(first.artifact_id).await?;

    assert_eq!(second.artifact_id, first.artifact_id);
    assert_eq!(second.version, 2);
    assert_eq!(latest.version, 2);
    assert_eq!(latest.title, "Requirements v2");
    assert_eq!(latest.content, "v2 body");
    assert_eq!(latest.created_at, first.created_at);
    assert_eq!(
        versions.iter().map(|version| version.version).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert_eq!(versions[0].content, "v1 body");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn saving_to_a_missing_artifact_creates_nothing(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;

    let err = ctx
        .artifacts
        .save_artifact_with_version(
            SaveArtifactRequest::new("Ghost", "text", "requirements", "body")
                .for_artifact(ArtifactId::new(404)),
        )
        .await
        .expect_err("missing artifact");

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(ctx.artifacts.list_latest_artifacts().await?.is_empty());
    Ok(())
}

#[rstest]
#[case("", "text", "requirements", "body")]
#[case("Title", "video", "requirements", "body")]
#[case("Title", "text", "roadmap", "body")]
#[case("Title", "text", "requirements", "   ")]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_saves_are_rejected(
    #[future] store: Result<StoreContext>,
    #[case] title: &str,
    #[case] kind: &str,
    #[case] category: &str,
    #[case] content: &str,
) -> Result<()> {
    let ctx = store.await?;

    let err = ctx
        .artifacts
        .save_artifact_with_version(SaveArtifactRequest::new(title, kind, category, content))
        .await
        .expect_err("invalid save");

    assert_eq!(err.kind(), ErrorKind::Validation);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_latest_returns_one_snapshot_per_artifact(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;
    let first = ctx.document("Alpha", "a1").await?;
    ctx.document("Beta", "b1").await?;
    ctx.artifacts
        .save_artifact_with_version(
            SaveArtifactRequest::new("Alpha", "text", "requirements", "a2")
                .for_artifact(first.artifact_id),
        )
        .await?;

    let latest = ctx.artifacts.list_latest_artifacts().await?;

    let summary: Vec<_> = latest
        .iter()
        .map(|snapshot| (snapshot.title.as_str(), snapshot.version))
        .collect();
    assert_eq!(summary, vec![("Alpha", 2), ("Beta", 1)]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn history_of_a_missing_artifact_is_not_found(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;

    let versions = ctx.artifacts.artifact_versions(ArtifactId::new(3)).await;
    let latest = ctx.artifacts.get_latest_artifact_snapshot(ArtifactId::new(3)).await;

    assert_eq!(versions.expect_err("missing").kind(), ErrorKind::NotFound);
    assert_eq!(latest.expect_err("missing").kind(), ErrorKind::NotFound);
    Ok(())
}
