//! Error types for artifact domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain artifact values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArtifactDomainError {
    /// The title is empty after trimming.
    #[error("artifact title must not be empty")]
    EmptyTitle,

    /// The version content is empty after trimming.
    #[error("artifact content must not be empty")]
    EmptyContent,

    /// The category matches no accepted alias.
    #[error("unknown artifact category: {0}")]
    InvalidCategory(String),

    /// The kind is not `text` or `diagram`.
    #[error("unknown artifact kind: {0}")]
    InvalidKind(String),

    /// The version format is not recognised.
    #[error("unknown version format: {0}")]
    InvalidVersionFormat(String),

    /// The export format is not recognised.
    #[error("unknown export format: {0}")]
    InvalidExportFormat(String),

    /// The source type is not `task`, `message`, or `manual`.
    #[error("unknown source type: {0}")]
    InvalidSourceType(String),

    /// An export carried neither inline content nor a location.
    #[error("export requires content or a location")]
    MissingExportPayload,
}
