use mesh_types::MeshError;
use stl_format::StlError;

/// Errors from loading, mutating or exporting an analyzed mesh.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AnalysisError {
    #[error("failed to parse STL: {0}")]
    Parse(#[from] StlError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error("unsupported export format: {format}")]
    UnsupportedFormat { format: String },

    #[error("failed to serialize statistics: {reason}")]
    Serialize { reason: String },

    #[error("failed to write {path}: {reason}")]
    Write { path: String, reason: String },
}
