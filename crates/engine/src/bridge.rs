//! Notification bridge: ties the tracker, the local cache and the desktop runtime.
//!
//! The work is split by stage:
//! 1. `checker`: poll the tracker and gate sound / desktop rendering on user options
//! 2. `renderer`: show each notification and cache it for later
//! 3. `lifecycle`: open (resolve + navigate) or dismiss a shown notification

use std::sync::Arc;
use std::time::Duration;

use hubbell_common::config::AppConfig;

use crate::ports::{
    DesktopNotifier, NotificationCache, NotificationSource, OptionsStore, SoundPlayer, TabOpener,
    TrackerApi,
};

/// Pause between two rendered notifications. Host runtimes drop or coalesce
/// notifications created in a tight burst.
pub const DEFAULT_RENDER_DELAY: Duration = Duration::from_millis(50);

/// The alert sound plays only when a poll brings in more than this many notifications.
pub const SOUND_BATCH_THRESHOLD: usize = 1;

pub const DEFAULT_CACHE_PREFIX: &str = "github-notifier";

pub const DEFAULT_ICON: &str = "assets/icon-notif.png";

/// Tunables of the bridge.
#[derive(Debug, Clone)]
pub struct BridgeSettings {
    /// Cache keys are `<cache_prefix>-<notification id>`
    pub cache_prefix: String,
    pub icon_url: String,
    pub render_delay: Duration,
}

impl BridgeSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            cache_prefix: config.notification_cache_prefix.clone(),
            icon_url: config.notification_icon.clone(),
            render_delay: Duration::from_millis(config.notification_delay_ms),
        }
    }
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            cache_prefix: DEFAULT_CACHE_PREFIX.to_string(),
            icon_url: DEFAULT_ICON.to_string(),
            render_delay: DEFAULT_RENDER_DELAY,
        }
    }
}

/// Everything the bridge talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub source: Arc<dyn NotificationSource>,
    pub api: Arc<dyn TrackerApi>,
    pub cache: Arc<dyn NotificationCache>,
    pub options: Arc<dyn OptionsStore>,
    pub notifier: Arc<dyn DesktopNotifier>,
    pub tabs: Arc<dyn TabOpener>,
    pub sound: Arc<dyn SoundPlayer>,
}

pub struct NotificationBridge {
    pub(crate) source: Arc<dyn NotificationSource>,
    pub(crate) api: Arc<dyn TrackerApi>,
    pub(crate) cache: Arc<dyn NotificationCache>,
    pub(crate) options: Arc<dyn OptionsStore>,
    pub(crate) notifier: Arc<dyn DesktopNotifier>,
    pub(crate) tabs: Arc<dyn TabOpener>,
    pub(crate) sound: Arc<dyn SoundPlayer>,
    pub(crate) settings: BridgeSettings,
}

impl NotificationBridge {
    pub fn new(collaborators: Collaborators, settings: BridgeSettings) -> Self {
        Self {
            source: collaborators.source,
            api: collaborators.api,
            cache: collaborators.cache,
            options: collaborators.options,
            notifier: collaborators.notifier,
            tabs: collaborators.tabs,
            sound: collaborators.sound,
            settings,
        }
    }

    /// Cache key (and desktop notification id) for a tracker notification id.
    pub fn cache_key(&self, notification_id: &str) -> String {
        format!("{}-{}", self.settings.cache_prefix, notification_id)
    }
}
