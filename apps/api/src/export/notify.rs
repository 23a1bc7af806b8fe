//! Notification surface: user-visible progress messages keyed by a stable
//! operation id, so a later state replaces the earlier one for that id.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationState {
    InProgress,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: String,
    pub state: NotificationState,
    pub message: String,
    pub updated_at: DateTime<Utc>,
}

/// Receives notification state changes.
pub trait Notifier: Send + Sync {
    fn notify(&self, id: &str, state: NotificationState, message: &str);
}

/// In-memory board holding the latest notification per id, in first-seen order.
#[derive(Debug, Default)]
pub struct NotificationBoard {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationBoard {
    pub fn snapshot(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn get(&self, id: &str) -> Option<Notification> {
        self.snapshot().into_iter().find(|n| n.id == id)
    }
}

impl Notifier for NotificationBoard {
    fn notify(&self, id: &str, state: NotificationState, message: &str) {
        match state {
            NotificationState::Error => error!(id, "{message}"),
            _ => info!(id, ?state, "{message}"),
        }

        let notification = Notification {
            id: id.to_string(),
            state,
            message: message.to_string(),
            updated_at: Utc::now(),
        };
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match entries.iter_mut().find(|n| n.id == id) {
            Some(existing) => *existing = notification,
            None => entries.push(notification),
        }
    }
}
