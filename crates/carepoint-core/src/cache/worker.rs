//! Cache worker lifecycle and fetch interception.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use super::{
    AssetRequest, AssetResponse, CacheError, CacheResult, CacheVersion, Destination, Fetcher,
    Method,
};
use crate::config::CacheConfig;
use crate::db::Database;

/// Worker lifecycle state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WorkerState {
    /// Created, install not attempted
    Parsed,
    Installing,
    /// Static partition filled, ready to take over
    Installed,
    /// Evicting partitions from earlier versions
    Activating,
    /// Serving fetches
    Active,
    /// Install failed; a new worker is needed
    Redundant,
}

/// How a fetch was answered.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Not intercepted; the page talks to the network directly
    Passthrough,
    /// Served from a cache partition
    Cache(AssetResponse),
    /// Served from the network
    Network(AssetResponse),
    /// Network unreachable; cached root document served instead
    OfflineFallback(AssetResponse),
}

impl FetchOutcome {
    pub fn response(&self) -> Option<&AssetResponse> {
        match self {
            FetchOutcome::Passthrough => None,
            FetchOutcome::Cache(r) | FetchOutcome::Network(r) | FetchOutcome::OfflineFallback(r) => {
                Some(r)
            }
        }
    }
}

/// One deployed version of the page asset cache.
pub struct AssetCache<F: Fetcher> {
    db: Mutex<Database>,
    fetcher: F,
    version: CacheVersion,
    assets: Vec<String>,
    fallback_document: String,
    state: Mutex<WorkerState>,
    clients_claimed: AtomicBool,
}

impl<F: Fetcher> AssetCache<F> {
    /// Create a worker for the configured version.
    pub fn new(db: Database, fetcher: F, config: &CacheConfig) -> Self {
        Self {
            db: Mutex::new(db),
            fetcher,
            version: CacheVersion::new(config.version),
            assets: config.assets.clone(),
            fallback_document: config.fallback_document.clone(),
            state: Mutex::new(WorkerState::Parsed),
            clients_claimed: AtomicBool::new(false),
        }
    }

    pub fn version(&self) -> &CacheVersion {
        &self.version
    }

    pub fn state(&self) -> WorkerState {
        self.state.lock().map(|s| *s).unwrap_or(WorkerState::Redundant)
    }

    /// Whether open pages are controlled by this worker.
    pub fn clients_claimed(&self) -> bool {
        self.clients_claimed.load(Ordering::SeqCst)
    }

    /// Pre-fetch the asset list into the static partition.
    ///
    /// Every asset is fetched before anything is written; one failure leaves
    /// the worker redundant and the cache untouched.
    pub async fn install(&self) -> CacheResult<()> {
        self.transition(WorkerState::Parsed, WorkerState::Installing)?;
        tracing::info!(version = self.version.version, assets = self.assets.len(), "Installing asset cache");

        let requests: Vec<AssetRequest> = self
            .assets
            .iter()
            .map(|url| AssetRequest::get(url.clone(), destination_for(url)))
            .collect();
        let results = join_all(requests.iter().map(|r| self.fetcher.fetch(r))).await;

        let mut fetched = Vec::with_capacity(requests.len());
        for (request, result) in requests.iter().zip(results) {
            let failure = match result {
                Ok(response) if (200..300).contains(&response.status) => {
                    fetched.push((request.url.as_str(), response));
                    continue;
                }
                Ok(response) => format!("HTTP {}", response.status),
                Err(e) => e.to_string(),
            };
            tracing::warn!(url = %request.url, reason = %failure, "Asset pre-fetch failed");
            self.set_state(WorkerState::Redundant)?;
            return Err(CacheError::InstallFailed {
                url: request.url.clone(),
                reason: failure,
            });
        }

        let written = self.with_db(|db| {
            db.atomically(|db| {
                db.open_partition(&self.version.static_name)?;
                for (url, response) in &fetched {
                    db.put_cache_entry(&self.version.static_name, url, response)?;
                }
                Ok(())
            })
            .map_err(CacheError::from)
        });
        if let Err(e) = written {
            self.set_state(WorkerState::Redundant)?;
            return Err(e);
        }

        self.set_state(WorkerState::Installed)?;
        tracing::info!(partition = %self.version.static_name, "Asset cache installed");
        Ok(())
    }

    /// Delete partitions from other versions and take control of open pages.
    ///
    /// Returns the names of the deleted partitions.
    pub async fn activate(&self) -> CacheResult<Vec<String>> {
        self.transition(WorkerState::Installed, WorkerState::Activating)?;

        let evicted = self.with_db(|db| {
            let mut deleted = Vec::new();
            for name in db.partition_names()? {
                if !self.version.owns(&name) {
                    tracing::info!(partition = %name, "Deleting old cache partition");
                    db.delete_partition(&name)?;
                    deleted.push(name);
                }
            }
            Ok(deleted)
        });

        let deleted = match evicted {
            Ok(deleted) => deleted,
            Err(e) => {
                self.set_state(WorkerState::Installed)?;
                return Err(e);
            }
        };

        self.clients_claimed.store(true, Ordering::SeqCst);
        self.set_state(WorkerState::Active)?;
        tracing::info!(version = self.version.version, evicted = deleted.len(), "Asset cache active");
        Ok(deleted)
    }

    /// Answer a page request: cache first, then network, then offline fallback.
    pub async fn handle_fetch(&self, request: &AssetRequest) -> CacheResult<FetchOutcome> {
        if request.method != Method::Get || self.state() != WorkerState::Active {
            return Ok(FetchOutcome::Passthrough);
        }

        if let Some(response) = self.cached(&request.url)? {
            return Ok(FetchOutcome::Cache(response));
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_cacheable() {
                    let put = self.with_db(|db| {
                        db.put_cache_entry(&self.version.dynamic_name, &request.url, &response)
                            .map_err(Into::into)
                    });
                    if let Err(e) = put {
                        tracing::warn!(url = %request.url, error = %e, "Failed to cache response");
                    }
                }
                Ok(FetchOutcome::Network(response))
            }
            Err(e) => {
                if request.destination == Destination::Document {
                    if let Some(fallback) = self.cached(&self.fallback_document)? {
                        tracing::debug!(url = %request.url, "Network down, serving offline document");
                        return Ok(FetchOutcome::OfflineFallback(fallback));
                    }
                }
                Err(CacheError::Network {
                    url: request.url.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Cache lookup across all partitions. Entries failing the digest check
    /// are evicted and reported as a miss.
    fn cached(&self, url: &str) -> CacheResult<Option<AssetResponse>> {
        self.with_db(|db| {
            let Some(entry) = db.match_cache_entry(url)? else {
                return Ok(None);
            };
            if entry.is_intact() {
                return Ok(Some(entry.response));
            }
            tracing::warn!(url, partition = %entry.partition, "Cached body corrupt, evicting");
            db.delete_cache_entry(&entry.partition, url)?;
            Ok(None)
        })
    }

    fn with_db<T>(&self, f: impl FnOnce(&Database) -> CacheResult<T>) -> CacheResult<T> {
        let db = self.db.lock().map_err(|_| CacheError::LockPoisoned)?;
        f(&db)
    }

    fn transition(&self, from: WorkerState, to: WorkerState) -> CacheResult<()> {
        let mut state = self.state.lock().map_err(|_| CacheError::LockPoisoned)?;
        if *state != from {
            return Err(CacheError::InvalidState(*state, from));
        }
        *state = to;
        Ok(())
    }

    fn set_state(&self, to: WorkerState) -> CacheResult<()> {
        let mut state = self.state.lock().map_err(|_| CacheError::LockPoisoned)?;
        *state = to;
        Ok(())
    }
}

/// Guess the request destination from an asset path.
fn destination_for(url: &str) -> Destination {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    if path.ends_with('/') || path.ends_with(".html") {
        Destination::Document
    } else if path.ends_with(".js") || path.ends_with(".ts") || path.ends_with(".tsx") {
        Destination::Script
    } else if path.ends_with(".css") {
        Destination::Style
    } else if path.ends_with(".json") || path.ends_with(".webmanifest") {
        Destination::Manifest
    } else if [".png", ".jpg", ".jpeg", ".svg", ".ico", ".webp"]
        .iter()
        .any(|ext| path.ends_with(ext))
    {
        Destination::Image
    } else {
        Destination::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_for() {
        assert_eq!(destination_for("/"), Destination::Document);
        assert_eq!(destination_for("/index.html"), Destination::Document);
        assert_eq!(destination_for("/src/main.tsx"), Destination::Script);
        assert_eq!(destination_for("/src/index.css?v=2"), Destination::Style);
        assert_eq!(destination_for("/manifest.json"), Destination::Manifest);
        assert_eq!(destination_for("/icon-192x192.png"), Destination::Image);
        assert_eq!(destination_for("/api/data"), Destination::Other);
    }

    #[test]
    fn test_outcome_response() {
        assert!(FetchOutcome::Passthrough.response().is_none());
        let outcome = FetchOutcome::Cache(AssetResponse::ok(b"x".to_vec()));
        assert_eq!(outcome.response().unwrap().body, b"x".to_vec());
    }
}
