//! Version exports and markdown rendering against SQLite.

use atelier::ErrorKind;
use atelier::artifact::{
    domain::{ArtifactId, ExportFormat, VersionId},
    services::{AddExportRequest, SaveArtifactRequest},
};
use eyre::Result;
use rstest::rstest;

use crate::sqlite::helpers::{StoreContext, store};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn export_requires_content_or_location(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;
    let snapshot = ctx.document("Spec", "body").await?;

    let err = ctx
        .artifacts
        .add_artifact_export(
            AddExportRequest::new(snapshot.version_id, "docx")
                .with_content("  ")
                .with_location(""),
        )
        .await
        .expect_err("empty payload");

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(ctx.artifacts.version_exports(snapshot.version_id).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn location_only_export_is_stored(#[future] store: Result<StoreContext>) -> Result<()> {
    let ctx = store.await?;
    let snapshot = ctx.document("Spec", "body").await?;

    let id = ctx
        .artifacts
        .add_artifact_export(
            AddExportRequest::new(snapshot.version_id, "png").with_location(" exports/spec.png "),
        )
        .await?;
    let exports = ctx.artifacts.version_exports(snapshot.version_id).await?;

    assert_eq!(exports.len(), 1);
    assert_eq!(exports[0].id, id);
    assert_eq!(exports[0].format, ExportFormat::Png);
    assert_eq!(exports[0].content, None);
    assert_eq!(exports[0].location.as_deref(), Some("exports/spec.png"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn export_to_an_unknown_version_is_not_found(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;

    let added = ctx
        .artifacts
        .add_artifact_export(AddExportRequest::new(VersionId::new(31), "markdown").with_content("x"))
        .await;
    let listed = ctx.artifacts.version_exports(VersionId::new(31)).await;

    assert_eq!(added.expect_err("missing").kind(), ErrorKind::NotFound);
    assert_eq!(listed.expect_err("missing").kind(), ErrorKind::NotFound);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_export_format_is_rejected(#[future] store: Result<StoreContext>) -> Result<()> {
    let ctx = store.await?;
    let snapshot = ctx.document("Spec", "body").await?;

    let err = ctx
        .artifacts
        .add_artifact_export(AddExportRequest::new(snapshot.version_id, "pdf").with_content("x"))
        .await
        .expect_err("unknown format");

    assert_eq!(err.kind(), ErrorKind::Validation);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn exports_stay_with_their_version(#[future] store: Result<StoreContext>) -> Result<()> {
    let ctx = store.await?;
    let first = ctx.document("Spec", "v1").await?;
    ctx.artifacts
        .add_artifact_export(AddExportRequest::new(first.version_id, "markdown").with_content("v1"))
        .await?;

    let second = ctx
        .artifacts
        .save_artifact_with_version(
            SaveArtifactRequest::new("Spec", "text", "requirements", "v2")
                .for_artifact(first.artifact_id),
        )
        .await?;

    assert_eq!(ctx.artifacts.version_exports(first.version_id).await?.len(), 1);
    assert!(ctx.artifacts.version_exports(second.version_id).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn markdown_export_renders_the_latest_version(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;
    let first = ctx.document("Checkout PRD", "Old body").await?;
    let latest = ctx
        .artifacts
        .save_artifact_with_version(
            SaveArtifactRequest::new("Checkout PRD", "text", "requirements", "New body")
                .for_artifact(first.artifact_id)
                .with_notes("reviewed"),
        )
        .await?;

    let export = ctx
        .artifacts
        .export_latest_as_markdown(first.artifact_id)
        .await?;
    let stored = ctx.artifacts.version_exports(latest.version_id).await?;

    let markdown = export.content.as_deref().unwrap_or_default();
    assert_eq!(export.version_id, latest.version_id);
    assert_eq!(export.format, ExportFormat::Markdown);
    assert!(markdown.starts_with("# Checkout PRD"));
    assert!(markdown.contains("- Version: 2"));
    assert!(markdown.contains("> reviewed"));
    assert!(markdown.contains("New body"));
    assert!(!markdown.contains("Old body"));
    assert_eq!(stored, vec![export]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn markdown_export_of_a_missing_artifact_is_not_found(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;

    let err = ctx
        .artifacts
        .export_latest_as_markdown(ArtifactId::new(12))
        .await
        .expect_err("missing artifact");

    assert_eq!(err.kind(), ErrorKind::NotFound);
    Ok(())
}
