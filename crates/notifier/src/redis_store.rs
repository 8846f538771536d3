//! Redis-backed notification cache and user options.
//!
//! Cached notifications are JSON strings under `hubbell:cache:<key>`; options
//! are fields of the `hubbell:options` hash, so they can be flipped from
//! `redis-cli` while the daemon runs.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use hubbell_common::config::parse_flag;
use hubbell_common::error::AppError;
use hubbell_common::types::{Notification, UserOptions};
use hubbell_engine::ports::{NotificationCache, OptionsStore};

const CACHE_NAMESPACE: &str = "hubbell:cache";

pub const OPTIONS_KEY: &str = "hubbell:options";

pub struct RedisNotificationCache {
    redis: ConnectionManager,
}

impl RedisNotificationCache {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    fn redis_key(key: &str) -> String {
        format!("{}:{}", CACHE_NAMESPACE, key)
    }
}

#[async_trait]
impl NotificationCache for RedisNotificationCache {
    async fn get(&self, key: &str) -> Result<Option<Notification>, AppError> {
        let mut redis = self.redis.clone();
        let raw: Option<String> = redis.get(Self::redis_key(key)).await?;

        Ok(raw.map(|json| serde_json::from_str(&json)).transpose()?)
    }

    async fn set(&self, key: &str, notification: &Notification) -> Result<(), AppError> {
        let mut redis = self.redis.clone();
        let json = serde_json::to_string(notification)?;
        redis.set::<_, _, ()>(Self::redis_key(key), json).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        let mut redis = self.redis.clone();
        redis.del::<_, ()>(Self::redis_key(key)).await?;
        Ok(())
    }
}

pub struct RedisOptionsStore {
    redis: ConnectionManager,
    defaults: UserOptions,
}

impl RedisOptionsStore {
    /// `defaults` apply to every option missing from the hash.
    pub fn new(redis: ConnectionManager, defaults: UserOptions) -> Self {
        Self { redis, defaults }
    }
}

#[async_trait]
impl OptionsStore for RedisOptionsStore {
    async fn get_all(&self) -> Result<UserOptions, AppError> {
        let mut redis = self.redis.clone();
        let fields: HashMap<String, String> = redis.hgetall(OPTIONS_KEY).await?;
        Ok(options_from_fields(&fields, self.defaults))
    }
}

/// Overlay stored option fields on the defaults. Unparseable values are ignored.
pub fn options_from_fields(fields: &HashMap<String, String>, defaults: UserOptions) -> UserOptions {
    let flag = |name: &str, default: bool| match fields.get(name) {
        Some(raw) => parse_flag(raw).unwrap_or_else(|| {
            tracing::warn!(option = name, value = %raw, "Ignoring unparseable option");
            default
        }),
        None => default,
    };

    UserOptions {
        show_desktop_notif: flag("show_desktop_notif", defaults.show_desktop_notif),
        play_notif_sound: flag("play_notif_sound", defaults.play_notif_sound),
    }
}
