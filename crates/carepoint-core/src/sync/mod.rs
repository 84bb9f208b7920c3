//! Offline sync.
//!
//! ```text
//! offline ──► stores append to pending queues
//! online ───► Idle → Syncing: every non-empty queue flushed in order,
//!             kinds in parallel; a kind is drained only if all its
//!             records were accepted → Idle
//! ```

mod backend;
mod connectivity;
mod coordinator;
mod notice;

pub use backend::*;
pub use connectivity::*;
pub use coordinator::*;
pub use notice::*;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::EntityKind;
use crate::store::StoreError;

/// Why a kind could not be flushed.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Backend rejected {kind:?} record: {reason}")]
    Backend { kind: EntityKind, reason: String },

    #[error("Submitting {kind:?} record timed out after {after:?}")]
    Timeout { kind: EntityKind, after: Duration },
}

/// Coordinator state; lives for the process only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Syncing,
}

/// Typed events published by the coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SyncEvent {
    ConnectivityChanged { online: bool },
    SyncStarted,
    SyncCompleted { flushed: usize },
    SyncFailed { kind: EntityKind, reason: String },
}
