//! User-visible notices.
//!
//! The core never renders anything; it publishes notices on a broadcast
//! channel and the UI layer decides how to show them.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A toast-style message for the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level,
        }
    }
}

/// Publishes notices to every subscriber.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notice>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    /// Publish a notice. Notices sent with no subscriber are only logged.
    pub fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => tracing::warn!(title = %notice.title, "{}", notice.message),
            _ => tracing::debug!(title = %notice.title, "{}", notice.message),
        }
        let _ = self.tx.send(notice);
    }

    pub fn success(&self, title: &str, message: &str) {
        self.notify(Notice::new(NoticeLevel::Success, title, message));
    }

    pub fn info(&self, title: &str, message: &str) {
        self.notify(Notice::new(NoticeLevel::Info, title, message));
    }

    pub fn warning(&self, title: &str, message: &str) {
        self.notify(Notice::new(NoticeLevel::Warning, title, message));
    }

    pub fn error(&self, title: &str, message: &str) {
        self.notify(Notice::new(NoticeLevel::Error, title, message));
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(64)
    }
}
