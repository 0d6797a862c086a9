use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Session store settings, loadable from TOML. Missing keys take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Upper bound on live sessions.
    pub max_sessions: usize,
    /// Idle time after which a session may be swept.
    pub session_ttl_secs: u64,
    /// Period of the background sweep.
    pub sweep_interval_secs: u64,
    /// Largest accepted upload.
    pub max_upload_bytes: usize,
    /// Where uploads are stored. When unset, a private temporary directory
    /// is created and removed with the store.
    pub upload_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_sessions: 1000,
            session_ttl_secs: 3600,
            sweep_interval_secs: 600,
            max_upload_bytes: 100 * 1024 * 1024,
            upload_dir: None,
        }
    }
}

impl StoreConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, StoreError> {
        let config: Self = toml::from_str(text).map_err(|e| StoreError::Config {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| StoreError::io(format!("reading {}", path.display()), e))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.max_sessions == 0 {
            return Err(StoreError::Config {
                reason: "max_sessions must be at least 1".to_string(),
            });
        }
        if self.sweep_interval_secs == 0 {
            return Err(StoreError::Config {
                reason: "sweep_interval_secs must be at least 1".to_string(),
            });
        }
        if self.max_upload_bytes == 0 {
            return Err(StoreError::Config {
                reason: "max_upload_bytes must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}
