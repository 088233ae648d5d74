//! Parent/child edge replacement against SQLite.

use atelier::ErrorKind;
use atelier::task::domain::{RelationChanges, TaskId};
use eyre::Result;
use rstest::rstest;

use crate::sqlite::helpers::{StoreContext, ids_of, store};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn children_are_replaced_not_merged(#[future] store: Result<StoreContext>) -> Result<()> {
    let ctx = store.await?;
    let ids = ctx.create_tasks(4).await?;

    ctx.tasks
        .set_relations(ids[0], &RelationChanges::new().with_children(vec![ids[1], ids[2]]))
        .await?;
    let task = ctx
        .tasks
        .set_relations(ids[0], &RelationChanges::new().with_children(vec![ids[3]]))
        .await?;

    assert_eq!(ids_of(task.children()), vec![ids[3].value()]);
    assert!(ctx.tasks.get(ids[1]).await?.parents().is_empty());
    assert_eq!(ids_of(ctx.tasks.get(ids[3]).await?.parents()), vec![ids[0].value()]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn parents_are_replaced_not_merged(#[future] store: Result<StoreContext>) -> Result<()> {
    let ctx = store.await?;
    let ids = ctx.create_tasks(4).await?;
    let (task, replaced, kept) = (ids[0], [ids[1], ids[2]], ids[3]);

    ctx.tasks
        .set_relations(task, &RelationChanges::new().with_parents(replaced.to_vec()))
        .await?;
    let updated = ctx
        .tasks
        .set_relations(task, &RelationChanges::new().with_parents(vec![kept]))
        .await?;

    assert_eq!(ids_of(updated.parents()), vec![kept.value()]);
    for former in replaced {
        assert!(ctx.tasks.get(former).await?.children().is_empty());
    }
    assert_eq!(ids_of(ctx.tasks.get(kept).await?.children()), vec![task.value()]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_cannot_be_its_own_child(#[future] store: Result<StoreContext>) -> Result<()> {
    let ctx = store.await?;
    let ids = ctx.create_tasks(1).await?;

    let task = ctx
        .tasks
        .set_relations(ids[0], &RelationChanges::new().with_children(vec![ids[0]]))
        .await?;

    assert!(task.children().is_empty());
    assert!(task.parents().is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn self_references_and_duplicates_are_dropped(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;
    let ids = ctx.create_tasks(2).await?;

    let task = ctx
        .tasks
        .set_relations(
            ids[0],
            &RelationChanges::new().with_parents(vec![ids[0], ids[1], ids[1]]),
        )
        .await?;

    assert_eq!(ids_of(task.parents()), vec![ids[1].value()]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unset_direction_is_untouched(#[future] store: Result<StoreContext>) -> Result<()> {
    let ctx = store.await?;
    let ids = ctx.create_tasks(3).await?;
    ctx.tasks
        .set_relations(
            ids[1],
            &RelationChanges::new()
                .with_parents(vec![ids[0]])
                .with_children(vec![ids[2]]),
        )
        .await?;

    let task = ctx
        .tasks
        .set_relations(ids[1], &RelationChanges::new().with_children(Vec::new()))
        .await?;

    assert_eq!(ids_of(task.parents()), vec![ids[0].value()]);
    assert!(task.children().is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_related_ids_are_rejected_without_changes(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;
    let ids = ctx.create_tasks(2).await?;
    ctx.tasks
        .set_relations(ids[0], &RelationChanges::new().with_children(vec![ids[1]]))
        .await?;

    let err = ctx
        .tasks
        .set_relations(
            ids[0],
            &RelationChanges::new().with_children(vec![TaskId::new(9), TaskId::new(4)]),
        )
        .await
        .expect_err("unknown children");

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("4, 9"));
    assert_eq!(
        ids_of(ctx.tasks.get(ids[0]).await?.children()),
        vec![ids[1].value()]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn relations_on_a_missing_task_report_not_found(
    #[future] store: Result<StoreContext>,
) -> Result<()> {
    let ctx = store.await?;

    let err = ctx
        .tasks
        .set_relations(TaskId::new(7), &RelationChanges::new().with_parents(Vec::new()))
        .await
        .expect_err("missing task");

    assert_eq!(err.kind(), ErrorKind::NotFound);
    Ok(())
}
