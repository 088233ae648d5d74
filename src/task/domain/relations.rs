//! Requested changes to a task's parent and child edges.

use super::TaskId;
use std::collections::BTreeSet;

/// Replacement edge lists for one task.
///
/// Each direction is independent. `None` leaves that direction untouched;
/// `Some` (even when empty) replaces every existing edge in that direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationChanges {
    parents: Option<Vec<TaskId>>,
    children: Option<Vec<TaskId>>,
}

impl RelationChanges {
    /// Creates a change set that touches neither direction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the task's parents with `parents`.
    #[must_use]
    pub fn with_parents(mut self, parents: impl IntoIterator<Item = TaskId>) -> Self {
        self.parents = Some(parents.into_iter().collect());
        self
    }

    /// Replaces the task's children with `children`.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = TaskId>) -> Self {
        self.children = Some(children.into_iter().collect());
        self
    }

    /// Returns the requested parents as supplied.
    #[must_use]
    pub fn parents(&self) -> Option<&[TaskId]> {
        self.parents.as_deref()
    }

    /// Returns the requested children as supplied.
    #[must_use]
    pub fn children(&self) -> Option<&[TaskId]> {
        self.children.as_deref()
    }

    /// Returns `true` when neither direction is being replaced.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.parents.is_none() && self.children.is_none()
    }

    /// Parents to store for `task`: deduplicated, sorted, self excluded.
    #[must_use]
    pub fn parents_for(&self, task: TaskId) -> Option<Vec<TaskId>> {
        self.parents.as_deref().map(|ids| normalize(ids, task))
    }

    /// Children to store for `task`: deduplicated, sorted, self excluded.
    #[must_use]
    pub fn children_for(&self, task: TaskId) -> Option<Vec<TaskId>> {
        self.children.as_deref().map(|ids| normalize(ids, task))
    }

    /// Every task referenced in either direction, other than `task` itself.
    #[must_use]
    pub fn referenced_ids(&self, task: TaskId) -> Vec<TaskId> {
        self.parents
            .iter()
            .chain(self.children.iter())
            .flatten()
            .copied()
            .filter(|id| *id != task)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn normalize(ids: &[TaskId], task: TaskId) -> Vec<TaskId> {
    ids.iter()
        .copied()
        .filter(|id| *id != task)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
