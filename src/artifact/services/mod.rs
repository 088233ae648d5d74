//! Application services for artifact orchestration.

mod artifacts;
mod render;

pub use artifacts::{
    AddExportRequest, ArtifactService, ArtifactServiceError, ArtifactServiceResult,
    SaveArtifactRequest,
};
pub use render::render_markdown;
