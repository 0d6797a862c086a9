use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
    TryLockError,
};

use chrono::{DateTime, Utc};
use mesh_analysis::MeshAnalyzer;
use mesh_types::Mesh;
use tempfile::TempDir;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::handle::MeshHandle;
use crate::session::SessionInfo;
use crate::stats::StoreStats;

/// The live analyzer slot of one session. `removed` is set by delete so a
/// materialize that raced with it cannot resurrect the instance.
#[derive(Debug, Default)]
struct InstanceSlot {
    analyzer: Option<MeshHandle>,
    removed: bool,
}

#[derive(Debug)]
struct SessionEntry {
    info: Mutex<SessionInfo>,
    slot: Mutex<InstanceSlot>,
}

/// Process-wide map from session id to uploaded file and cached mesh.
///
/// Lock order: the session map before an entry's `info`, an entry's
/// `slot` before the map or its `info`. The map lock is never held across
/// file I/O or parsing, so work on different sessions proceeds in parallel.
#[derive(Debug)]
pub struct SessionStore {
    config: StoreConfig,
    upload_dir: PathBuf,
    // Dropped with the store, removing every upload under it.
    _temp_dir: Option<TempDir>,
    clock: Arc<dyn Clock>,
    sessions: RwLock<HashMap<Uuid, Arc<SessionEntry>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SessionStore {
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: StoreConfig, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        config.validate()?;
        let (upload_dir, temp_dir) = match &config.upload_dir {
            Some(dir) => {
                fs::create_dir_all(dir)
                    .map_err(|e| StoreError::io(format!("creating {}", dir.display()), e))?;
                (dir.clone(), None)
            }
            None => {
                let temp = tempfile::Builder::new()
                    .prefix("stl_api_")
                    .tempdir()
                    .map_err(|e| StoreError::io("creating temporary upload directory", e))?;
                (temp.path().to_path_buf(), Some(temp))
            }
        };
        info!(
            upload_dir = %upload_dir.display(),
            max_sessions = config.max_sessions,
            ttl_secs = config.session_ttl_secs,
            "session store ready"
        );
        Ok(Self {
            config,
            upload_dir,
            _temp_dir: temp_dir,
            clock,
            sessions: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn len(&self) -> usize {
        read(&self.sessions).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Store an upload under a fresh session id.
    ///
    /// When the store is full an expiry sweep runs first; if that frees
    /// nothing the call fails. Live sessions are never evicted.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn create(&self, bytes: &[u8], filename: &str) -> Result<Uuid, StoreError> {
        if bytes.is_empty() {
            return Err(StoreError::InvalidUpload {
                reason: "file is empty".to_string(),
            });
        }
        if bytes.len() > self.config.max_upload_bytes {
            return Err(StoreError::InvalidUpload {
                reason: format!(
                    "file is {} bytes, limit is {}",
                    bytes.len(),
                    self.config.max_upload_bytes
                ),
            });
        }
        let filename = sanitize_filename(filename)?;

        if self.len() >= self.config.max_sessions {
            self.sweep_now();
            if self.len() >= self.config.max_sessions {
                return Err(self.capacity_exceeded());
            }
        }

        let id = Uuid::new_v4();
        let dir = self.upload_dir.join(id.to_string());
        let path = dir.join(&filename);
        fs::create_dir_all(&dir)
            .map_err(|e| StoreError::io(format!("creating {}", dir.display()), e))?;
        if let Err(e) = fs::write(&path, bytes) {
            remove_dir(&dir);
            return Err(StoreError::io(format!("writing {}", path.display()), e));
        }

        let info = SessionInfo::new(id, filename, bytes.len(), path, self.clock.now());
        let entry = Arc::new(SessionEntry {
            info: Mutex::new(info),
            slot: Mutex::new(InstanceSlot::default()),
        });

        {
            let mut sessions = write(&self.sessions);
            // Concurrent creates may have filled the store since the check above.
            if sessions.len() >= self.config.max_sessions {
                drop(sessions);
                remove_dir(&dir);
                return Err(self.capacity_exceeded());
            }
            sessions.insert(id, entry);
        }

        info!(session_id = %id, "created session");
        Ok(id)
    }

    /// Session metadata. Refreshes the last-accessed time.
    pub fn get(&self, id: Uuid) -> Result<SessionInfo, StoreError> {
        let entry = self.touched_entry(id)?;
        let info = lock(&entry.info).clone();
        Ok(info)
    }

    /// Metadata of every session, oldest upload first. Does not touch.
    pub fn list(&self) -> Vec<SessionInfo> {
        let sessions = read(&self.sessions);
        let mut out: Vec<SessionInfo> = sessions.values().map(|e| lock(&e.info).clone()).collect();
        out.sort_by_key(|i| i.upload_time);
        out
    }

    /// The session's live analyzer, parsing the stored upload on first use.
    ///
    /// Concurrent callers for the same id serialize on that session's slot,
    /// so at most one instance is ever created per session.
    #[instrument(skip(self))]
    pub fn materialize(&self, id: Uuid) -> Result<MeshHandle, StoreError> {
        let entry = self.touched_entry(id)?;
        let mut slot = lock(&entry.slot);
        if slot.removed {
            return Err(StoreError::NotFound { id });
        }

        if let Some(handle) = slot.analyzer.clone() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            self.touch(&entry);
            return Ok(handle);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let (mesh, source) = load_mesh(&entry)?;
        if !self.is_current(id, &entry) {
            return Err(StoreError::NotFound { id });
        }
        let handle = MeshHandle::new(MeshAnalyzer::new(mesh, Some(source)));
        slot.analyzer = Some(handle.clone());
        self.touch(&entry);
        debug!(session_id = %id, "materialized mesh");
        Ok(handle)
    }

    /// The live analyzer if one exists, without loading.
    pub fn loaded(&self, id: Uuid) -> Result<MeshHandle, StoreError> {
        let entry = self.entry(id)?;
        let slot = lock(&entry.slot);
        match &slot.analyzer {
            Some(handle) if !slot.removed => Ok(handle.clone()),
            _ if slot.removed => Err(StoreError::NotFound { id }),
            _ => Err(StoreError::NotLoaded { id }),
        }
    }

    /// Re-parse the stored upload, undoing every mutation.
    ///
    /// An existing instance is updated in place so outstanding handles see
    /// the reset mesh.
    #[instrument(skip(self))]
    pub fn reset(&self, id: Uuid) -> Result<MeshHandle, StoreError> {
        let entry = self.touched_entry(id)?;
        let mut slot = lock(&entry.slot);
        if slot.removed {
            return Err(StoreError::NotFound { id });
        }

        let (mesh, source) = load_mesh(&entry)?;
        if !self.is_current(id, &entry) {
            return Err(StoreError::NotFound { id });
        }
        let handle = match slot.analyzer.clone() {
            Some(handle) => {
                handle.with(|a| a.replace_mesh(mesh));
                handle
            }
            None => {
                let handle = MeshHandle::new(MeshAnalyzer::new(mesh, Some(source)));
                slot.analyzer = Some(handle.clone());
                handle
            }
        };
        self.touch(&entry);
        info!(session_id = %id, "reset mesh from stored upload");
        Ok(handle)
    }

    /// The bytes exactly as uploaded.
    pub fn original_bytes(&self, id: Uuid) -> Result<Vec<u8>, StoreError> {
        let entry = self.touched_entry(id)?;
        let path = lock(&entry.info).file_path.clone();
        fs::read(&path).map_err(|e| StoreError::io(format!("reading {}", path.display()), e))
    }

    /// Drop the session, its cached instance and its stored file.
    /// Returns false when the id is unknown.
    #[instrument(skip(self))]
    pub fn delete(&self, id: Uuid) -> bool {
        let removed = write(&self.sessions).remove(&id);
        match removed {
            Some(entry) => {
                self.discard(id, &entry);
                true
            }
            None => false,
        }
    }

    /// Remove every session idle for longer than the TTL at `now`.
    ///
    /// Candidates are collected under a read lock, then each is re-checked
    /// under the write lock before removal, so a session touched in between
    /// survives.
    #[instrument(skip(self))]
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let removed = self
            .expired_candidates(now)
            .into_iter()
            .filter(|(id, candidate)| self.remove_if_expired(*id, candidate, now))
            .count();
        if removed > 0 {
            info!(removed, "swept expired sessions");
        }
        removed
    }

    /// [`sweep_expired`](Self::sweep_expired) at the store clock's now.
    pub fn sweep_now(&self) -> usize {
        self.sweep_expired(self.clock.now())
    }

    /// Delete every session. Used at shutdown when uploads live in a
    /// configured directory that outlives the store.
    pub fn clear(&self) -> usize {
        let drained: Vec<(Uuid, Arc<SessionEntry>)> = write(&self.sessions).drain().collect();
        for (id, entry) in &drained {
            self.discard(*id, entry);
        }
        drained.len()
    }

    pub fn stats(&self) -> StoreStats {
        let now = self.clock.now();
        let ttl = self.config.session_ttl();
        // Snapshot first, then never wait on a slot: one may be held for
        // the length of a parse. A busy slot counts as not cached.
        let sessions: Vec<Arc<SessionEntry>> = read(&self.sessions).values().cloned().collect();

        let mut expired = 0;
        let mut total_bytes = 0u64;
        let mut cached = 0;
        for entry in &sessions {
            {
                let info = lock(&entry.info);
                if info.is_expired(now, ttl) {
                    expired += 1;
                }
                total_bytes += info.file_size as u64;
            }
            let is_cached = match entry.slot.try_lock() {
                Ok(slot) => slot.analyzer.is_some(),
                Err(TryLockError::Poisoned(p)) => p.into_inner().analyzer.is_some(),
                Err(TryLockError::WouldBlock) => false,
            };
            if is_cached {
                cached += 1;
            }
        }

        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        StoreStats {
            total_sessions: sessions.len(),
            active_sessions: sessions.len() - expired,
            expired_sessions: expired,
            max_sessions: self.config.max_sessions,
            total_size_bytes: total_bytes,
            total_size_mb: total_bytes as f64 / (1024.0 * 1024.0),
            upload_dir: self.upload_dir.clone(),
            cached_instances: cached,
            cache_hits: hits,
            cache_misses: misses,
            hit_rate: hits as f64 / (hits + misses).max(1) as f64,
        }
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn entry(&self, id: Uuid) -> Result<Arc<SessionEntry>, StoreError> {
        read(&self.sessions)
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    /// Look up and touch under the map's read lock, so a sweep cannot
    /// remove the entry between the lookup and the refresh.
    fn touched_entry(&self, id: Uuid) -> Result<Arc<SessionEntry>, StoreError> {
        let sessions = read(&self.sessions);
        let entry = sessions.get(&id).ok_or(StoreError::NotFound { id })?;
        self.touch(entry);
        Ok(Arc::clone(entry))
    }

    fn touch(&self, entry: &SessionEntry) {
        lock(&entry.info).last_accessed = self.clock.now();
    }

    /// Whether `entry` is still the one stored under `id`.
    fn is_current(&self, id: Uuid, entry: &Arc<SessionEntry>) -> bool {
        read(&self.sessions)
            .get(&id)
            .is_some_and(|current| Arc::ptr_eq(current, entry))
    }

    fn expired_candidates(&self, now: DateTime<Utc>) -> Vec<(Uuid, Arc<SessionEntry>)> {
        let ttl = self.config.session_ttl();
        read(&self.sessions)
            .iter()
            .filter(|(_, e)| lock(&e.info).is_expired(now, ttl))
            .map(|(id, e)| (*id, Arc::clone(e)))
            .collect()
    }

    /// Remove a sweep candidate unless it was replaced or touched since the
    /// snapshot. The re-check runs under the write lock.
    fn remove_if_expired(
        &self,
        id: Uuid,
        candidate: &Arc<SessionEntry>,
        now: DateTime<Utc>,
    ) -> bool {
        let ttl = self.config.session_ttl();
        let entry = {
            let mut sessions = write(&self.sessions);
            let still_expired = sessions.get(&id).is_some_and(|current| {
                Arc::ptr_eq(current, candidate) && lock(&current.info).is_expired(now, ttl)
            });
            if !still_expired {
                return false;
            }
            sessions.remove(&id)
        };
        match entry {
            Some(entry) => {
                self.discard(id, &entry);
                true
            }
            None => false,
        }
    }

    fn capacity_exceeded(&self) -> StoreError {
        warn!(max_sessions = self.config.max_sessions, "session store full");
        StoreError::CapacityExceeded {
            max_sessions: self.config.max_sessions,
        }
    }

    /// Tear down an entry already removed from the map.
    fn discard(&self, id: Uuid, entry: &SessionEntry) {
        {
            let mut slot = lock(&entry.slot);
            slot.removed = true;
            slot.analyzer = None;
        }
        let dir = lock(&entry.info).session_dir().map(Path::to_path_buf);
        if let Some(dir) = dir {
            remove_dir(&dir);
        }
        debug!(session_id = %id, "deleted session");
    }
}

/// Parse the stored upload. Also returns the path label for the analyzer.
fn load_mesh(entry: &SessionEntry) -> Result<(Mesh, String), StoreError> {
    let path = lock(&entry.info).file_path.clone();
    let bytes =
        fs::read(&path).map_err(|e| StoreError::io(format!("reading {}", path.display()), e))?;
    let mesh = stl_format::parse_stl(&bytes)?;
    Ok((mesh, path.display().to_string()))
}

/// Keep only the final path component, so uploads cannot escape their
/// session directory. Only `.stl` names are accepted, in any case.
fn sanitize_filename(filename: &str) -> Result<String, StoreError> {
    let name = Path::new(filename.trim())
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| StoreError::InvalidUpload {
            reason: format!("unusable filename {filename:?}"),
        })?;
    let is_stl = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("stl"));
    if !is_stl {
        return Err(StoreError::InvalidUpload {
            reason: format!("only .stl files are supported, got {name:?}"),
        });
    }
    Ok(name.to_string())
}

// Storage failures while deleting are logged, not surfaced: the session is
// already gone from the map.
fn remove_dir(dir: &Path) {
    if let Err(e) = fs::remove_dir_all(dir) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(dir = %dir.display(), error = %e, "failed to remove session directory");
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(l: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    l.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(l: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    l.write().unwrap_or_else(PoisonError::into_inner)
}
