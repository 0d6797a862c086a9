use stl_format::StlError;
use uuid::Uuid;

/// Errors from session-store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session not found: {id}")]
    NotFound { id: Uuid },

    #[error("session {id} has no mesh loaded")]
    NotLoaded { id: Uuid },

    #[error("maximum number of sessions reached ({max_sessions})")]
    CapacityExceeded { max_sessions: usize },

    #[error("invalid upload: {reason}")]
    InvalidUpload { reason: String },

    #[error("failed to parse stored STL: {0}")]
    Parse(#[from] StlError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {reason}")]
    Config { reason: String },
}

impl StoreError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
