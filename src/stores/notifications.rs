use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Default lifetime of a toast
pub const AUTO_DISMISS_DELAY: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Error,
    Success,
}

/// A dismissible message for the user
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    expires_at: Instant,
}

/// Anything that can show a message to the user
pub trait NotificationSink: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: String) -> Uuid;
}

/// Notification list with auto-dismiss
///
/// Expired entries are pruned lazily whenever the list is read.
#[derive(Debug)]
pub struct Notifications {
    auto_dismiss: Duration,
    entries: Mutex<Vec<Notification>>,
}

impl Notifications {
    pub fn new(auto_dismiss: Duration) -> Self {
        Self {
            auto_dismiss,
            entries: Mutex::new(Vec::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, kind: NotificationKind, message: impl Into<String>) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            created_at: Utc::now(),
            expires_at: Instant::now() + self.auto_dismiss,
        };
        let id = notification.id;

        tracing::debug!("Notification {:?}: {}", kind, notification.message);
        self.entries().push(notification);
        id
    }

    pub fn show_error(&self, message: impl Into<String>) -> Uuid {
        self.add(NotificationKind::Error, message)
    }

    pub fn show_success(&self, message: impl Into<String>) -> Uuid {
        self.add(NotificationKind::Success, message)
    }

    pub fn remove(&self, id: Uuid) {
        self.entries().retain(|n| n.id != id);
    }

    pub fn clear_all(&self) {
        self.entries().clear();
    }

    /// Notifications still visible now
    pub fn active(&self) -> Vec<Notification> {
        self.active_at(Instant::now())
    }

    /// Notifications still visible at `now`, dropping the expired ones
    pub fn active_at(&self, now: Instant) -> Vec<Notification> {
        let mut entries = self.entries();
        entries.retain(|n| n.expires_at > now);
        entries.clone()
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(AUTO_DISMISS_DELAY)
    }
}

impl NotificationSink for Notifications {
    fn notify(&self, kind: NotificationKind, message: String) -> Uuid {
        self.add(kind, message)
    }
}
