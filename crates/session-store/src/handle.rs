use std::sync::{Arc, Mutex, PoisonError};

use mesh_analysis::MeshAnalyzer;

/// Shared reference to a session's single live analyzer.
///
/// Clones point at the same instance; use [`MeshHandle::ptr_eq`] to check.
#[derive(Debug, Clone)]
pub struct MeshHandle(Arc<Mutex<MeshAnalyzer>>);

impl MeshHandle {
    pub(crate) fn new(analyzer: MeshAnalyzer) -> Self {
        Self(Arc::new(Mutex::new(analyzer)))
    }

    /// Run `f` with exclusive access to the analyzer.
    pub fn with<R>(&self, f: impl FnOnce(&mut MeshAnalyzer) -> R) -> R {
        let mut guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn ptr_eq(&self, other: &MeshHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
