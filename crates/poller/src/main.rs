use std::sync::Arc;

use hubbell_common::config::AppConfig;
use hubbell_common::redis_pool::create_redis_pool;
use hubbell_common::types::UserOptions;
use hubbell_engine::ports::{NotificationCache, OptionsStore, SoundPlayer};
use hubbell_engine::store::{MemoryNotificationCache, StaticOptionsStore};
use hubbell_engine::{BridgeSettings, Collaborators, NotificationBridge};
use hubbell_notifier::desktop::{REPORTS_ACTIONS, SystemNotifier};
use hubbell_notifier::github::GitHubClient;
use hubbell_notifier::redis_store::{RedisNotificationCache, RedisOptionsStore};
use hubbell_notifier::tabs::SystemTabOpener;
use hubbell_poller::poller::NotificationPoller;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "hubbell=info,hubbell_poller=info,hubbell_engine=info,hubbell_notifier=info".into()
            }),
        )
        .json()
        .init();

    tracing::info!("Hubbell notifier starting...");

    // Load configuration
    let config = AppConfig::from_env()?;

    let github = Arc::new(GitHubClient::new(&config)?);

    let defaults = UserOptions {
        show_desktop_notif: config.show_desktop_notif,
        play_notif_sound: config.play_notif_sound,
    };

    // Notification cache + user options
    let (cache, options) = match &config.redis_url {
        Some(redis_url) => {
            let redis = create_redis_pool(redis_url).await?;
            (
                Arc::new(RedisNotificationCache::new(redis.clone())) as Arc<dyn NotificationCache>,
                Arc::new(RedisOptionsStore::new(redis, defaults)) as Arc<dyn OptionsStore>,
            )
        }
        None => {
            tracing::info!("REDIS_URL not set, keeping notifications and options in memory");
            (
                Arc::new(MemoryNotificationCache::new()) as Arc<dyn NotificationCache>,
                Arc::new(StaticOptionsStore::new(defaults)) as Arc<dyn OptionsStore>,
            )
        }
    };

    let (notifier, events) = SystemNotifier::new("Hubbell");
    if !REPORTS_ACTIONS {
        tracing::warn!(
            "Desktop runtime does not report clicks; cached notifications are never evicted"
        );
    }

    let bridge = NotificationBridge::new(
        Collaborators {
            source: github.clone(),
            api: github,
            cache,
            options,
            notifier: Arc::new(notifier),
            tabs: Arc::new(SystemTabOpener::default()),
            sound: sound_player(&config),
        },
        BridgeSettings::from_config(&config),
    );

    let mut poller = NotificationPoller::new(
        bridge,
        events,
        config.poll_interval_secs,
        config.notify_on_startup,
    );

    // Run with graceful shutdown on Ctrl+C
    tokio::select! {
        result = poller.run() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Notification poller exited with error");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping gracefully...");
        }
    }

    tracing::info!("Hubbell notifier stopped.");
    Ok(())
}

#[cfg(feature = "audio")]
fn sound_player(config: &AppConfig) -> Arc<dyn SoundPlayer> {
    Arc::new(hubbell_notifier::sound::RodioSoundPlayer::new(
        &config.notification_sound,
    ))
}

#[cfg(not(feature = "audio"))]
fn sound_player(config: &AppConfig) -> Arc<dyn SoundPlayer> {
    Arc::new(hubbell_notifier::sound::CommandSoundPlayer::new(
        &config.sound_command,
        &config.notification_sound,
    ))
}
