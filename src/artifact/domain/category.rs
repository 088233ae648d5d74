//! Artifact categories and their accepted spellings.
//!
//! Storage uses lowercase canonical names (`entity_diagram`); callers see a
//! single uppercase external spelling per category (`ER_DIAGRAM`). Input may
//! use either spelling or one of several aliases. Every external spelling
//! normalises back to its own category, so external names round-trip.

use super::ArtifactDomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Category of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactCategory {
    /// Requirements text.
    Requirements,
    /// Use case diagram.
    UseCase,
    /// Sequence diagram.
    Sequence,
    /// Class diagram.
    Class,
    /// Entity relationship diagram.
    Entity,
    /// Component diagram.
    Component,
    /// Activity diagram.
    Activity,
}

/// Accepted spellings after lowercasing and reading `-` and spaces as `_`.
const ALIASES: &[(&str, ArtifactCategory)] = &[
    ("requirements", ArtifactCategory::Requirements),
    ("requirement", ArtifactCategory::Requirements),
    ("req", ArtifactCategory::Requirements),
    ("srs", ArtifactCategory::Requirements),
    ("use_case_diagram", ArtifactCategory::UseCase),
    ("use_case", ArtifactCategory::UseCase),
    ("usecase", ArtifactCategory::UseCase),
    ("sequence_diagram", ArtifactCategory::Sequence),
    ("sequence", ArtifactCategory::Sequence),
    ("class_diagram", ArtifactCategory::Class),
    ("class", ArtifactCategory::Class),
    ("entity_diagram", ArtifactCategory::Entity),
    ("er_diagram", ArtifactCategory::Entity),
    ("erd", ArtifactCategory::Entity),
    ("er", ArtifactCategory::Entity),
    ("entity", ArtifactCategory::Entity),
    ("component_diagram", ArtifactCategory::Component),
    ("component", ArtifactCategory::Component),
    ("activity_diagram", ArtifactCategory::Activity),
    ("activity", ArtifactCategory::Activity),
];

impl ArtifactCategory {
    /// Every category.
    pub const ALL: [Self; 7] = [
        Self::Requirements,
        Self::UseCase,
        Self::Sequence,
        Self::Class,
        Self::Entity,
        Self::Component,
        Self::Activity,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Requirements => "requirements",
            Self::UseCase => "use_case_diagram",
            Self::Sequence => "sequence_diagram",
            Self::Class => "class_diagram",
            Self::Entity => "entity_diagram",
            Self::Component => "component_diagram",
            Self::Activity => "activity_diagram",
        }
    }

    /// Returns the spelling shown to callers.
    #[must_use]
    pub const fn external_name(self) -> &'static str {
        match self {
            Self::Requirements => "REQUIREMENTS",
            Self::UseCase => "USE_CASE",
            Self::Sequence => "SEQUENCE",
            Self::Class => "CLASS",
            Self::Entity => "ER_DIAGRAM",
            Self::Component => "COMPONENT",
            Self::Activity => "ACTIVITY",
        }
    }
}

impl TryFrom<&str> for ArtifactCategory {
    type Error = ArtifactDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        normalize_category(value)
    }
}

impl fmt::Display for ArtifactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.external_name())
    }
}

impl Serialize for ArtifactCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.external_name())
    }
}

impl<'de> Deserialize<'de> for ArtifactCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        normalize_category(&raw).map_err(serde::de::Error::custom)
    }
}

/// Maps any accepted spelling onto its category.
///
/// Matching ignores case and surrounding whitespace and treats `-` and inner
/// spaces as `_`.
///
/// # Errors
///
/// Returns [`ArtifactDomainError::InvalidCategory`] for unknown spellings.
pub fn normalize_category(raw: &str) -> Result<ArtifactCategory, ArtifactDomainError> {
    let key: String = raw
        .trim()
        .chars()
        .map(|ch| {
            if ch == '-' || ch.is_whitespace() {
                '_'
            } else {
                ch.to_ascii_lowercase()
            }
        })
        .collect();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|&(_, category)| category)
        .ok_or_else(|| ArtifactDomainError::InvalidCategory(raw.to_owned()))
}

/// Returns the external spelling of a category.
#[must_use]
pub const fn to_external_category(category: ArtifactCategory) -> &'static str {
    category.external_name()
}
