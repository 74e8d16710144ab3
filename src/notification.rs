use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A single user-visible notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub tag: String,
    pub id: i32,
    pub title: String,
    pub text: String,
    pub posted_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(tag: &str, id: i32, title: &str, text: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id,
            title: title.to_string(),
            text: text.to_string(),
            posted_at: Utc::now(),
        }
    }
}

/// Platform notification system: post, or replace whatever already sits
/// under the same `(tag, id)`.
pub trait NotificationSink: Send + Sync {
    fn post(&self, notification: Notification);
}

/// In-memory notification tray
///
/// Keeps one visible notification per `(tag, id)` slot plus the full posting
/// history, in order.
#[derive(Debug, Default)]
pub struct NotificationTray {
    visible: Mutex<HashMap<(String, i32), Notification>>,
    history: Mutex<Vec<Notification>>,
}

impl NotificationTray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notification currently shown in a slot
    pub fn visible(&self, tag: &str, id: i32) -> Option<Notification> {
        self.visible
            .lock()
            .ok()
            .and_then(|slots| slots.get(&(tag.to_string(), id)).cloned())
    }

    pub fn visible_count(&self) -> usize {
        self.visible.lock().map(|slots| slots.len()).unwrap_or(0)
    }

    /// Everything ever posted, oldest first
    pub fn history(&self) -> Vec<Notification> {
        self.history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut slots) = self.visible.lock() {
            slots.clear();
        }
        if let Ok(mut history) = self.history.lock() {
            history.clear();
        }
    }
}

impl NotificationSink for NotificationTray {
    fn post(&self, notification: Notification) {
        log::info!(
            "[notify] {}#{} {}: {}",
            notification.tag,
            notification.id,
            notification.title,
            notification.text
        );

        match self.visible.lock() {
            Ok(mut slots) => {
                let key = (notification.tag.clone(), notification.id);
                if slots.insert(key, notification.clone()).is_some() {
                    log::debug!("[notify] replaced previous notification");
                }
            }
            Err(_) => log::error!("[notify] tray slots lock poisoned, dropping notification"),
        }

        if let Ok(mut history) = self.history.lock() {
            history.push(notification);
        }
    }
}

/// Sink that only writes notifications to the log
#[derive(Debug, Default)]
pub struct LogSink {
    posted: AtomicUsize,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posted(&self) -> usize {
        self.posted.load(Ordering::Relaxed)
    }
}

impl NotificationSink for LogSink {
    fn post(&self, notification: Notification) {
        self.posted.fetch_add(1, Ordering::Relaxed);
        log::info!(
            "[notify] {}#{} {}: {}",
            notification.tag,
            notification.id,
            notification.title,
            notification.text
        );
    }
}
