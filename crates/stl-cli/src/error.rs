use std::io;

use mesh_analysis::AnalysisError;
use plating_calc::CalcError;
use session_store::StoreError;

/// Errors surfaced to the command line.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {target}: {source}")]
    Write {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Calc(#[from] CalcError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("async runtime error: {reason}")]
    Runtime { reason: String },
}

impl CliError {
    pub(crate) fn stdout(source: io::Error) -> Self {
        CliError::Write {
            target: "stdout".to_string(),
            source,
        }
    }
}
