use std::fmt;

use tokio::sync::broadcast;

use super::{App, Plugin, PluginError};

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Fan-out of user-facing notifications to every subscriber.
///
/// Pushing never fails: with no subscribers the notification is dropped.
/// A subscriber that falls more than the channel capacity behind loses the
/// oldest notifications.
#[derive(Debug, Clone)]
pub struct Notifications {
    sender: broadcast::Sender<Notification>,
}

impl Notifications {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Returns how many subscribers received the notification.
    pub fn push(&self, level: NotificationLevel, message: impl Into<String>) -> usize {
        let notification = Notification {
            level,
            message: message.into(),
        };
        tracing::trace!(level = %notification.level, message = %notification.message, "Notification");
        self.sender.send(notification).unwrap_or(0)
    }

    pub fn success(&self, message: impl Into<String>) -> usize {
        self.push(NotificationLevel::Success, message)
    }

    pub fn info(&self, message: impl Into<String>) -> usize {
        self.push(NotificationLevel::Info, message)
    }

    pub fn warn(&self, message: impl Into<String>) -> usize {
        self.push(NotificationLevel::Warning, message)
    }

    pub fn error(&self, message: impl Into<String>) -> usize {
        self.push(NotificationLevel::Error, message)
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Plugin for Notifications {
    const NAME: &'static str = "notifications";
    type Options = ();

    fn requires(&self) -> &'static [&'static str] {
        &["router"]
    }

    fn install(self, app: &mut App, _options: ()) -> Result<(), PluginError> {
        app.provide(self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::{RecvError, TryRecvError};

    #[tokio::test]
    async fn subscribers_receive_in_order() {
        let notifications = Notifications::default();
        let mut rx = notifications.subscribe();

        assert_eq!(notifications.success("saved"), 1);
        notifications.error("failed");

        assert_eq!(
            rx.recv().await.unwrap(),
            Notification {
                level: NotificationLevel::Success,
                message: "saved".into()
            }
        );
        assert_eq!(rx.recv().await.unwrap().level, NotificationLevel::Error);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn push_without_subscribers_is_dropped() {
        let notifications = Notifications::default();
        assert_eq!(notifications.info("nobody listens"), 0);
    }

    #[tokio::test]
    async fn lagging_subscriber_loses_oldest() {
        let notifications = Notifications::new(2);
        let mut rx = notifications.subscribe();
        notifications.info("one");
        notifications.info("two");
        notifications.info("three");

        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(1))));
        assert_eq!(rx.recv().await.unwrap().message, "two");
        assert_eq!(rx.recv().await.unwrap().message, "three");
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let notifications = Notifications::new(0);
        let _rx = notifications.subscribe();
        assert_eq!(notifications.warn("still works"), 1);
    }
}
