//! User-visible alerts.
//!
//! The engine raises a notification when a new high score is committed.
//! Alerts carry a fixed id per category; delivering a second alert with the
//! same id replaces any unread earlier one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Channel used for high score alerts.
pub const HIGHSCORE_CHANNEL_ID: &str = "shakeit_channel";
/// Human-readable name of the high score channel.
pub const HIGHSCORE_CHANNEL_NAME: &str = "ShakeIt Channel";
/// Notification id reused for every high score alert.
pub const HIGHSCORE_NOTIFICATION_ID: i32 = 1;

/// A single alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub channel_id: String,
    /// Display name a host registers the channel under.
    pub channel_name: String,
    pub id: i32,
    pub title: String,
    pub message: String,
}

impl Notification {
    /// The alert raised for a newly committed high score.
    pub fn new_highscore(highscore: u64) -> Self {
        Self {
            channel_id: HIGHSCORE_CHANNEL_ID.to_string(),
            channel_name: HIGHSCORE_CHANNEL_NAME.to_string(),
            id: HIGHSCORE_NOTIFICATION_ID,
            title: "ShakeIt - New Highscore".to_string(),
            message: format!("Your new highscore is: {highscore}"),
        }
    }
}

/// Receives alerts.
pub trait Notifier {
    fn notify(&mut self, notification: &Notification);
}

/// Writes alerts to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: &Notification) {
        info!(
            channel = %notification.channel_id,
            id = notification.id,
            title = %notification.title,
            "{}",
            notification.message
        );
    }
}

/// Holds unread alerts, one per id.
#[derive(Debug, Clone, Default)]
pub struct NotificationTray {
    pending: BTreeMap<i32, Notification>,
    delivered: u64,
}

impl NotificationTray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unread alerts, ordered by id.
    pub fn pending(&self) -> impl Iterator<Item = &Notification> {
        self.pending.values()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Total alerts delivered, including replaced ones.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Remove and return the unread alert with `id`.
    pub fn take(&mut self, id: i32) -> Option<Notification> {
        self.pending.remove(&id)
    }

    /// Remove and return the lowest-id unread alert.
    pub fn pop(&mut self) -> Option<Notification> {
        let id = *self.pending.keys().next()?;
        self.pending.remove(&id)
    }
}

impl Notifier for NotificationTray {
    fn notify(&mut self, notification: &Notification) {
        self.pending.insert(notification.id, notification.clone());
        self.delivered += 1;
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&mut self, notification: &Notification) {
        (**self).notify(notification)
    }
}
