use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;

use hubbell_common::types::NotificationEvent;
use hubbell_engine::NotificationBridge;

/// Poll loop that drives the bridge and routes desktop clicks back into it.
pub struct NotificationPoller {
    bridge: NotificationBridge,
    events: mpsc::UnboundedReceiver<NotificationEvent>,
    events_open: bool,
    poll_interval: Duration,
    /// Cursor handed to the next poll.
    last_modified: Option<String>,
}

impl NotificationPoller {
    /// With `notify_on_startup` off, the first poll only reports notifications
    /// updated after the poller was created.
    pub fn new(
        bridge: NotificationBridge,
        events: mpsc::UnboundedReceiver<NotificationEvent>,
        poll_interval_secs: u64,
        notify_on_startup: bool,
    ) -> Self {
        let last_modified = if notify_on_startup {
            None
        } else {
            Some(Utc::now().to_rfc2822())
        };

        Self {
            bridge,
            events,
            events_open: true,
            poll_interval: Duration::from_secs(poll_interval_secs),
            last_modified,
        }
    }

    pub fn last_modified(&self) -> Option<&str> {
        self.last_modified.as_deref()
    }

    /// Start the polling loop. Runs indefinitely until the task is cancelled.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        tracing::info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            "Notification poller started"
        );

        loop {
            let delay = self.poll_once().await;

            let sleep = tokio::time::sleep(delay);
            tokio::pin!(sleep);

            loop {
                tokio::select! {
                    _ = &mut sleep => break,
                    event = self.events.recv(), if self.events_open => match event {
                        Some(event) => self.handle_event(event).await,
                        None => {
                            tracing::warn!("Desktop event channel closed; clicks are no longer handled");
                            self.events_open = false;
                        }
                    },
                }
            }
        }
    }

    /// Run one poll cycle and return how long to wait before the next one.
    ///
    /// A failed cycle is logged and leaves the cursor untouched.
    pub async fn poll_once(&mut self) -> Duration {
        match self
            .bridge
            .check_notifications(self.last_modified.as_deref())
            .await
        {
            Ok(outcome) => {
                if outcome.fetched > 0 {
                    tracing::info!(
                        fetched = outcome.fetched,
                        rendered = outcome.rendered,
                        sound_played = outcome.sound_played,
                        "Poll complete"
                    );
                }
                if let Some(last_modified) = outcome.last_modified {
                    self.last_modified = Some(last_modified);
                }
                next_delay(self.poll_interval, outcome.poll_interval_secs)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Notification poll failed");
                self.poll_interval
            }
        }
    }

    pub async fn handle_event(&self, event: NotificationEvent) {
        let result = match &event {
            NotificationEvent::Clicked(key) => self.bridge.open_notification(key).await.map(|_| ()),
            NotificationEvent::Closed(key) => self.bridge.dismiss_notification(key).await,
        };

        if let Err(e) = result {
            tracing::warn!(event = ?event, error = %e, "Failed to handle notification event");
        }
    }
}

/// The configured interval, stretched to the server's `X-Poll-Interval` when larger.
pub fn next_delay(configured: Duration, server_secs: Option<u64>) -> Duration {
    match server_secs {
        Some(secs) => configured.max(Duration::from_secs(secs)),
        None => configured,
    }
}
