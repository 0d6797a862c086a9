/// Errors from building or mutating a [`Mesh`](crate::Mesh).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("malformed vertex buffer: {reason}")]
    MalformedBuffer { reason: String },
}
