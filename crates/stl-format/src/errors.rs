use mesh_types::MeshError;

/// Errors while decoding STL bytes. No partial mesh is ever returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StlError {
    #[error("STL data is empty")]
    Empty,

    #[error("STL data truncated: expected at least {expected} bytes, got {got}")]
    Truncated { expected: usize, got: usize },

    #[error("binary STL declares {declared} triangles ({expected} bytes) but data is {got} bytes")]
    LengthMismatch {
        declared: u32,
        expected: u64,
        got: usize,
    },

    #[error("line {line}: invalid vertex: {reason}")]
    InvalidVertex { line: usize, reason: String },

    #[error("line {line}: malformed facet: {reason}")]
    MalformedFacet { line: usize, reason: String },

    #[error("STL contains no triangles")]
    NoTriangles,

    #[error("ASCII STL is not valid UTF-8: {reason}")]
    InvalidText { reason: String },

    #[error("invalid mesh data: {0}")]
    InvalidMesh(#[from] MeshError),
}
