//! In-memory notification list served by `/api/notifications`.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// A notification shown to front-end users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Notification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            link: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Append-only list, volatile like the caches.
#[derive(Debug, Default)]
pub struct NotificationStore {
    items: RwLock<Vec<Notification>>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, notification: Notification) {
        self.items
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification);
    }

    /// The last `n` notifications, oldest first.
    pub fn recent(&self, n: usize) -> Vec<Notification> {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        items[items.len().saturating_sub(n)..].to_vec()
    }

    pub fn len(&self) -> usize {
        self.items.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.items.write().unwrap_or_else(|e| e.into_inner()).clear();
    }
}
