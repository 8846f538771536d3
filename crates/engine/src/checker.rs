use hubbell_common::error::AppError;

use crate::bridge::{NotificationBridge, SOUND_BATCH_THRESHOLD};

/// What a single poll did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollOutcome {
    /// Notifications returned by the source
    pub fetched: usize,
    /// Notifications shown on the desktop (0 when desktop notifications are off)
    pub rendered: usize,
    pub sound_played: bool,
    /// Cursor for the next poll, when the source reported one
    pub last_modified: Option<String>,
    /// Server-requested minimum seconds before the next poll
    pub poll_interval_secs: Option<u64>,
}

impl NotificationBridge {
    /// Fetch notifications newer than `last_modified` and announce them
    /// according to the user's options.
    ///
    /// Sound and desktop rendering are gated independently. A failed sound is
    /// logged and never keeps the batch from being rendered.
    pub async fn check_notifications(
        &self,
        last_modified: Option<&str>,
    ) -> Result<PollOutcome, AppError> {
        let batch = self.source.fetch_notifications(last_modified).await?;
        let options = self.options.get_all().await?;
        let fetched = batch.notifications.len();

        let mut outcome = PollOutcome {
            fetched,
            last_modified: batch.last_modified,
            poll_interval_secs: batch.poll_interval_secs,
            ..Default::default()
        };

        if fetched == 0 {
            return Ok(outcome);
        }

        tracing::info!(
            count = fetched,
            show_desktop_notif = options.show_desktop_notif,
            play_notif_sound = options.play_notif_sound,
            "New notifications"
        );

        if options.play_notif_sound && fetched > SOUND_BATCH_THRESHOLD {
            match self.sound.play().await {
                Ok(()) => outcome.sound_played = true,
                Err(e) => tracing::warn!(error = %e, "Alert sound failed"),
            }
        }

        if options.show_desktop_notif {
            self.show_notifications(&batch.notifications).await?;
            outcome.rendered = fetched;
        }

        Ok(outcome)
    }
}
