//! Provenance references linking artifacts to their origins.

use super::{ArtifactId, MessageId};
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Description stored on the fallback source of an artifact with no
/// recorded origin.
pub const MANUAL_SOURCE_DESCRIPTION: &str = "manually created artifact";

/// Task and message ids to attach to an artifact.
///
/// Ids that are not positive are discarded; the rest are deduplicated and
/// sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRefs {
    tasks: Vec<TaskId>,
    messages: Vec<MessageId>,
}

impl SourceRefs {
    /// Creates an empty set of references.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds references from raw caller-supplied ids.
    #[must_use]
    pub fn from_raw(task_ids: &[i64], message_ids: &[i64]) -> Self {
        Self {
            tasks: positive_unique(task_ids).map(TaskId::new).collect(),
            messages: positive_unique(message_ids).map(MessageId::new).collect(),
        }
    }

    /// Returns the task references.
    #[must_use]
    pub fn tasks(&self) -> &[TaskId] {
        &self.tasks
    }

    /// Returns the message references.
    #[must_use]
    pub fn messages(&self) -> &[MessageId] {
        &self.messages
    }

    /// Returns `true` when no usable id was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.messages.is_empty()
    }
}

fn positive_unique(ids: &[i64]) -> impl Iterator<Item = i64> {
    ids.iter()
        .copied()
        .filter(|id| *id > 0)
        .collect::<BTreeSet<_>>()
        .into_iter()
}

/// Where a source points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "sourceType",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum SourceOrigin {
    /// A task in the graph.
    Task {
        /// Referenced task.
        task_id: TaskId,
    },
    /// A conversation message.
    Message {
        /// Referenced message.
        message_id: MessageId,
    },
    /// No recorded origin.
    Manual {
        /// Fixed fallback description.
        description: String,
    },
}

/// Stored provenance link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSource {
    /// Artifact the source belongs to.
    pub artifact_id: ArtifactId,
    /// What the source refers to.
    #[serde(flatten)]
    pub origin: SourceOrigin,
    /// When the link was recorded.
    pub created_at: DateTime<Utc>,
}
