use hubbell_common::error::AppError;
use hubbell_common::types::{DisplayKind, Notification, NotificationDisplay};

use crate::bridge::NotificationBridge;
use crate::reasons::reason_text;

/// Build the desktop notification shown for a tracker notification.
pub fn display_for(notification: &Notification, icon_url: &str) -> NotificationDisplay {
    NotificationDisplay {
        title: notification.subject.title.clone(),
        icon_url: icon_url.to_string(),
        kind: DisplayKind::Basic,
        message: notification.repository.full_name.clone(),
        context_message: reason_text(&notification.reason).to_string(),
    }
}

impl NotificationBridge {
    /// Show and cache each notification in order, one at a time.
    ///
    /// Runtime or storage failures abort the batch and are returned as-is.
    pub async fn show_notifications(
        &self,
        notifications: &[Notification],
    ) -> Result<(), AppError> {
        for notification in notifications {
            let key = self.cache_key(&notification.id);
            let display = display_for(notification, &self.settings.icon_url);

            self.notifier.create(&key, &display).await?;
            self.cache.set(&key, notification).await?;

            tracing::debug!(
                key = %key,
                subject_type = %notification.subject.kind,
                "Notification shown"
            );

            tokio::time::sleep(self.settings.render_delay).await;
        }

        Ok(())
    }
}
