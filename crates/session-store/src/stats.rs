use std::path::PathBuf;

use serde::Serialize;

/// Point-in-time counters for the whole store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreStats {
    pub total_sessions: usize,
    pub active_sessions: usize,
    pub expired_sessions: usize,
    pub max_sessions: usize,
    pub total_size_bytes: u64,
    pub total_size_mb: f64,
    pub upload_dir: PathBuf,
    pub cached_instances: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// `hits / max(1, hits + misses)`.
    pub hit_rate: f64,
}
