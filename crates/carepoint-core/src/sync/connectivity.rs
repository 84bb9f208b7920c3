//! Shared online flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Whether the device can currently reach the backend.
///
/// Clones share the same flag; the sync coordinator writes it and the
/// record store reads it when stamping new records.
#[derive(Debug, Clone)]
pub struct Connectivity {
    online: Arc<AtomicBool>,
}

impl Connectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(online)),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Set the flag and return the previous value.
    pub fn set(&self, online: bool) -> bool {
        self.online.swap(online, Ordering::SeqCst)
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new(true)
    }
}
