//! Closed vocabularies for artifact kinds and formats.

use super::ArtifactDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an artifact is prose or a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Prose document.
    Text,
    /// Diagram with textual source.
    Diagram,
}

impl ArtifactKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Diagram => "diagram",
        }
    }
}

impl TryFrom<&str> for ArtifactKind {
    type Error = ArtifactDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "diagram" => Ok(Self::Diagram),
            _ => Err(ArtifactDomainError::InvalidKind(value.to_owned())),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format of a version's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionFormat {
    /// Markdown prose.
    Markdown,
    /// `PlantUML` diagram source.
    Plantuml,
    /// Plain text.
    Text,
}

impl VersionFormat {
    /// Format assumed when a save does not name one.
    #[must_use]
    pub const fn default_for(kind: ArtifactKind) -> Self {
        match kind {
            ArtifactKind::Text => Self::Markdown,
            ArtifactKind::Diagram => Self::Plantuml,
        }
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Plantuml => "plantuml",
            Self::Text => "text",
        }
    }
}

impl TryFrom<&str> for VersionFormat {
    type Error = ArtifactDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "markdown" => Ok(Self::Markdown),
            "plantuml" => Ok(Self::Plantuml),
            "text" => Ok(Self::Text),
            _ => Err(ArtifactDomainError::InvalidVersionFormat(value.to_owned())),
        }
    }
}

impl fmt::Display for VersionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format of a rendered export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Markdown document.
    Markdown,
    /// Word document.
    Docx,
    /// Raster image.
    Png,
    /// `PlantUML` diagram source.
    Plantuml,
}

impl ExportFormat {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Docx => "docx",
            Self::Png => "png",
            Self::Plantuml => "plantuml",
        }
    }
}

impl TryFrom<&str> for ExportFormat {
    type Error = ArtifactDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "markdown" => Ok(Self::Markdown),
            "docx" => Ok(Self::Docx),
            "png" => Ok(Self::Png),
            "plantuml" => Ok(Self::Plantuml),
            _ => Err(ArtifactDomainError::InvalidExportFormat(value.to_owned())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of provenance recorded for an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// A task in the graph.
    Task,
    /// A conversation message.
    Message,
    /// No recorded origin.
    Manual,
}

impl SourceType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Message => "message",
            Self::Manual => "manual",
        }
    }
}

impl TryFrom<&str> for SourceType {
    type Error = ArtifactDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "task" => Ok(Self::Task),
            "message" => Ok(Self::Message),
            "manual" => Ok(Self::Manual),
            _ => Err(ArtifactDomainError::InvalidSourceType(value.to_owned())),
        }
    }
}
