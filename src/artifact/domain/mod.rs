//! Domain model for artifacts, their versions, sources, and exports.

mod artifact;
mod category;
mod error;
mod export;
mod ids;
mod kinds;
mod source;

pub use artifact::{ArtifactSnapshot, ArtifactVersion, NewArtifactVersion};
pub use category::{ArtifactCategory, normalize_category, to_external_category};
pub use error::ArtifactDomainError;
pub use export::{ArtifactExport, ExportPayload, NewExport};
pub use ids::{ArtifactId, ExportId, MessageId, VersionId};
pub use kinds::{ArtifactKind, ExportFormat, SourceType, VersionFormat};
pub use source::{ArtifactSource, MANUAL_SOURCE_DESCRIPTION, SourceOrigin, SourceRefs};
