use hubbell_common::error::AppError;

use crate::bridge::NotificationBridge;
use crate::resolver::resolve_target_url;

impl NotificationBridge {
    /// Handle a click on a shown notification and return the URL that was opened.
    ///
    /// The desktop notification and its cache entry are gone before resolution
    /// starts, so a failed resolution never leaves a stale notification behind.
    pub async fn open_notification(&self, key: &str) -> Result<String, AppError> {
        let cached = self.cache.get(key).await?;
        self.notifier.clear(key).await?;
        self.cache.remove(key).await?;

        let resolved = match cached {
            Some(notification) => resolve_target_url(self.api.as_ref(), &notification).await,
            None => Err(AppError::Internal(format!("no cached notification for {}", key))),
        };

        let target = match resolved {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Falling back to notifications tab");
                self.api.fallback_tab_url()
            }
        };

        self.tabs.open_tab(&target).await?;
        tracing::info!(key = %key, url = %target, "Notification opened");

        Ok(target)
    }

    /// Handle a notification closed without being opened.
    pub async fn dismiss_notification(&self, key: &str) -> Result<(), AppError> {
        self.notifier.clear(key).await?;
        self.cache.remove(key).await?;

        tracing::debug!(key = %key, "Notification dismissed");
        Ok(())
    }
}
