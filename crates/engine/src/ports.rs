//! Collaborator interfaces the bridge is driven through.
//!
//! Concrete adapters (tracker REST client, Redis stores, desktop runtime) live
//! in `hubbell-notifier`; in-process stores live in [`crate::store`].

use async_trait::async_trait;

use hubbell_common::error::AppError;
use hubbell_common::types::{
    Comment, Notification, NotificationBatch, NotificationDisplay, Resource, UserOptions,
};

/// Source of unread notifications.
#[async_trait]
pub trait NotificationSource: Send + Sync {
    /// Fetch notifications newer than `cursor`. The cursor is opaque to the
    /// bridge; pagination and caching are the source's business.
    async fn fetch_notifications(
        &self,
        cursor: Option<&str>,
    ) -> Result<NotificationBatch, AppError>;
}

/// Tracker API calls used while resolving where a notification should open.
#[async_trait]
pub trait TrackerApi: Send + Sync {
    /// List comments on the resource at `path` created after `since`.
    async fn fetch_comments(
        &self,
        path: &str,
        since: &str,
        per_page: u32,
    ) -> Result<Vec<Comment>, AppError>;

    /// Fetch the resource at `path`. A "not found" answer is returned as a
    /// `Resource` whose `message` is `"Not Found"`, not as an error.
    async fn fetch_resource(&self, path: &str) -> Result<Resource, AppError>;

    /// Hostname of the tracker's web UI (e.g. `github.com`).
    fn browsing_hostname(&self) -> String;

    /// Generic landing page used when nothing more precise can be opened.
    fn fallback_tab_url(&self) -> String;
}

/// Local cache of rendered notifications, keyed by cache key.
#[async_trait]
pub trait NotificationCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Notification>, AppError>;
    async fn set(&self, key: &str, notification: &Notification) -> Result<(), AppError>;
    /// Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait OptionsStore: Send + Sync {
    async fn get_all(&self) -> Result<UserOptions, AppError>;
}

/// Host notification runtime.
#[async_trait]
pub trait DesktopNotifier: Send + Sync {
    async fn create(&self, key: &str, display: &NotificationDisplay) -> Result<(), AppError>;
    /// Clearing a notification that is no longer shown is not an error.
    async fn clear(&self, key: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait TabOpener: Send + Sync {
    /// Ask the browser to navigate to `url`. Does not wait for the page.
    async fn open_tab(&self, url: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait SoundPlayer: Send + Sync {
    /// Start playing the alert sound. Does not wait for playback to finish.
    async fn play(&self) -> Result<(), AppError>;
}
