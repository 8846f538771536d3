//! OS notifications via notify-rust.
//!
//! On freedesktop platforms a background thread waits for the user's action
//! on each notification and reports it as a `NotificationEvent`. Elsewhere the
//! notification is shown and no events are produced: nothing is tracked here,
//! and the bridge's cache entries stay until the cache is dropped (restart for
//! the in-memory cache, never for Redis). The daemon is meant for XDG desktops.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use hubbell_common::error::AppError;
use hubbell_common::types::{NotificationDisplay, NotificationEvent};
use hubbell_engine::ports::DesktopNotifier;

/// Whether the desktop runtime reports clicks and closes back to us.
pub const REPORTS_ACTIONS: bool = cfg!(all(unix, not(target_os = "macos")));

pub struct SystemNotifier {
    app_name: String,
    events: mpsc::UnboundedSender<NotificationEvent>,
    shown: Arc<Mutex<HashSet<String>>>,
}

impl SystemNotifier {
    /// Returns the notifier and the receiving end of its click / close events.
    pub fn new(app_name: &str) -> (Self, mpsc::UnboundedReceiver<NotificationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let notifier = Self {
            app_name: app_name.to_string(),
            events: tx,
            shown: Arc::new(Mutex::new(HashSet::new())),
        };
        (notifier, rx)
    }

    /// Number of notifications shown and not yet cleared.
    pub fn active_count(&self) -> usize {
        self.shown.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Remember a shown notification until its click or close arrives.
    fn track(&self, key: &str) {
        if !REPORTS_ACTIONS {
            return;
        }
        if let Ok(mut shown) = self.shown.lock() {
            shown.insert(key.to_string());
        }
    }
}

#[async_trait]
impl DesktopNotifier for SystemNotifier {
    async fn create(&self, key: &str, display: &NotificationDisplay) -> Result<(), AppError> {
        let app_name = self.app_name.clone();
        let owned_key = key.to_string();
        let display = display.clone();
        let events = self.events.clone();

        // D-Bus / platform calls block
        tokio::task::spawn_blocking(move || show_blocking(&app_name, owned_key, &display, events))
            .await
            .map_err(|e| AppError::Internal(format!("notification task failed: {}", e)))??;

        self.track(key);
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<(), AppError> {
        // The runtime has already taken the notification down on click or close.
        let was_shown = self
            .shown
            .lock()
            .map(|mut shown| shown.remove(key))
            .unwrap_or(false);

        if !was_shown {
            tracing::debug!(key = %key, "Notification already cleared");
        }
        Ok(())
    }
}

fn body_text(display: &NotificationDisplay) -> String {
    if display.context_message.is_empty() {
        display.message.clone()
    } else {
        format!("{}\n{}", display.message, display.context_message)
    }
}

fn show_blocking(
    app_name: &str,
    key: String,
    display: &NotificationDisplay,
    events: mpsc::UnboundedSender<NotificationEvent>,
) -> Result<(), AppError> {
    let mut notification = notify_rust::Notification::new();
    notification
        .appname(app_name)
        .summary(&display.title)
        .body(&body_text(display))
        .icon(&display.icon_url);

    #[cfg(all(unix, not(target_os = "macos")))]
    notification.action("default", "Open");

    let handle = notification
        .show()
        .map_err(|e| AppError::Notification(e.to_string()))?;

    #[cfg(all(unix, not(target_os = "macos")))]
    std::thread::spawn(move || {
        handle.wait_for_action(|action| {
            let event = match action {
                "__closed" => NotificationEvent::Closed(key),
                _ => NotificationEvent::Clicked(key),
            };
            // Receiver gone means the daemon is shutting down
            let _ = events.send(event);
        });
    });

    #[cfg(not(all(unix, not(target_os = "macos"))))]
    let _ = (handle, key, events);

    Ok(())
}

#[cfg(test)]
mod tests {
    use hubbell_common::types::DisplayKind;

    use super::*;

    fn display(context: &str) -> NotificationDisplay {
        NotificationDisplay {
            title: "Fix flaky build".to_string(),
            icon_url: "icon.png".to_string(),
            kind: DisplayKind::Basic,
            message: "octo/hello".to_string(),
            context_message: context.to_string(),
        }
    }

    #[test]
    fn test_body_includes_reason_line() {
        assert_eq!(body_text(&display("New comment")), "octo/hello\nNew comment");
    }

    #[test]
    fn test_body_without_reason() {
        assert_eq!(body_text(&display("")), "octo/hello");
    }

    #[tokio::test]
    async fn test_clearing_unknown_key_is_a_noop() {
        let (notifier, _events) = SystemNotifier::new("test");
        notifier.clear("github-notifier-1").await.unwrap();
        notifier.clear("github-notifier-1").await.unwrap();
        assert_eq!(notifier.active_count(), 0);
    }

    #[tokio::test]
    async fn test_tracking_follows_action_support() {
        let (notifier, _events) = SystemNotifier::new("test");
        notifier.track("github-notifier-1");
        notifier.track("github-notifier-2");

        let expected = if REPORTS_ACTIONS { 2 } else { 0 };
        assert_eq!(notifier.active_count(), expected);

        notifier.clear("github-notifier-1").await.unwrap();
        assert_eq!(notifier.active_count(), expected / 2);
    }
}
