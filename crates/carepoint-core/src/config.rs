//! Runtime configuration.
//!
//! Every key is optional; anything missing falls back to [`Default`].
//!
//! ```toml
//! [storage]
//! quota_bytes = 5242880
//!
//! [sync]
//! simulated_latency_ms = 500
//! flush_timeout_ms = 30000
//!
//! [cache]
//! version = 2
//! assets = ["/", "/index.html"]
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::DEFAULT_QUOTA_BYTES;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoreConfig {
    pub storage: StorageConfig,
    pub sync: SyncConfig,
    pub cache: CacheConfig,
}

impl CoreConfig {
    /// Parse from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Local-storage allowance in bytes
    pub quota_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SyncConfig {
    /// Per-record latency of the simulated backend
    pub simulated_latency_ms: u64,
    /// Upper bound on a single record submission; 0 waits forever
    pub flush_timeout_ms: u64,
    /// Buffered events per subscriber before the slowest one lags
    pub event_capacity: usize,
}

impl SyncConfig {
    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    pub fn flush_timeout(&self) -> Option<Duration> {
        (self.flush_timeout_ms > 0).then(|| Duration::from_millis(self.flush_timeout_ms))
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            simulated_latency_ms: 500,
            flush_timeout_ms: 30_000,
            event_capacity: 64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// Deployed version; bumping it renames both partitions
    pub version: u32,
    /// Assets pre-fetched at install
    pub assets: Vec<String>,
    /// Document served to navigations while offline
    pub fallback_document: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            version: 2,
            assets: vec![
                "/".into(),
                "/index.html".into(),
                "/src/main.tsx".into(),
                "/src/index.css".into(),
                "/manifest.json".into(),
            ],
            fallback_document: "/index.html".into(),
        }
    }
}
