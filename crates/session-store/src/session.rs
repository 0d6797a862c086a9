use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Metadata for one uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub filename: String,
    pub file_size: usize,
    pub upload_time: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    /// Stored upload, inside the session's own directory.
    pub file_path: PathBuf,
}

impl SessionInfo {
    pub(crate) fn new(
        id: Uuid,
        filename: String,
        file_size: usize,
        file_path: PathBuf,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            filename,
            file_size,
            upload_time: now,
            last_accessed: now,
            file_path,
        }
    }

    /// Idle for strictly longer than `ttl` at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: std::time::Duration) -> bool {
        match (now - self.last_accessed).to_std() {
            Ok(idle) => idle > ttl,
            // last_accessed is in the future
            Err(_) => false,
        }
    }

    /// Directory owning the stored file.
    pub fn session_dir(&self) -> Option<&std::path::Path> {
        self.file_path.parent()
    }
}
