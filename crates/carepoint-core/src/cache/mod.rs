//! Page asset cache.
//!
//! Cache-aside layer for static page resources:
//!
//! ```text
//! install ──► static-v{n} pre-filled with the asset list (all or nothing)
//! activate ─► every partition except static-v{n} / dynamic-v{n} deleted
//! fetch ────► GET only: cache hit │ network (+ copy to dynamic-v{n})
//!                                 │ offline: cached root document
//! ```

mod worker;

pub use worker::*;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::DbError;

/// Asset cache errors.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Install failed fetching {url}: {reason}")]
    InstallFailed { url: String, reason: String },

    #[error("Network error for {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Worker is {0:?}, expected {1:?}")]
    InvalidState(WorkerState, WorkerState),

    #[error("Lock poisoned")]
    LockPoisoned,
}

pub type CacheResult<T> = Result<T, CacheError>;

/// HTTP method of an intercepted request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
}

/// What the page is loading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Destination {
    /// Top-level navigation
    Document,
    Script,
    Style,
    Image,
    Manifest,
    Other,
}

/// A page resource request.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRequest {
    pub url: String,
    pub method: Method,
    pub destination: Destination,
}

impl AssetRequest {
    /// A GET request.
    pub fn get(url: impl Into<String>, destination: Destination) -> Self {
        Self {
            url: url.into(),
            method: Method::Get,
            destination,
        }
    }
}

/// Response provenance, mirroring the fetch API's response types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ResponseType {
    /// Same-origin
    Basic,
    Cors,
    Opaque,
    Error,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Basic => "basic",
            ResponseType::Cors => "cors",
            ResponseType::Opaque => "opaque",
            ResponseType::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "basic" => ResponseType::Basic,
            "cors" => ResponseType::Cors,
            "opaque" => ResponseType::Opaque,
            _ => ResponseType::Error,
        }
    }
}

/// A network or cached response.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetResponse {
    pub status: u16,
    pub response_type: ResponseType,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl AssetResponse {
    /// A 200 same-origin response.
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            response_type: ResponseType::Basic,
            headers: Vec::new(),
            body,
        }
    }

    /// Worth keeping in the dynamic partition.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.response_type == ResponseType::Basic
    }
}

/// Network failure reported by a [`Fetcher`].
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct FetchError(pub String);

/// The network.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, FetchError>;
}

/// Partition names for one deployed version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheVersion {
    pub version: u32,
    pub static_name: String,
    pub dynamic_name: String,
}

impl CacheVersion {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            static_name: format!("static-v{}", version),
            dynamic_name: format!("dynamic-v{}", version),
        }
    }

    /// Whether a partition belongs to this version.
    pub fn owns(&self, partition: &str) -> bool {
        partition == self.static_name || partition == self.dynamic_name
    }
}
