//! In-process stores for running without Redis.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use hubbell_common::error::AppError;
use hubbell_common::types::{Notification, UserOptions};

use crate::ports::{NotificationCache, OptionsStore};

/// Notification cache held in memory; entries are lost on restart.
#[derive(Default)]
pub struct MemoryNotificationCache {
    entries: RwLock<HashMap<String, Notification>>,
}

impl MemoryNotificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    // Inspection helpers for tests and diagnostics; the bridge only goes
    // through `NotificationCache`.

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Stored keys, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl NotificationCache for MemoryNotificationCache {
    async fn get(&self, key: &str) -> Result<Option<Notification>, AppError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, notification: &Notification) -> Result<(), AppError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), notification.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Options that never change at runtime (taken from configuration).
pub struct StaticOptionsStore {
    options: UserOptions,
}

impl StaticOptionsStore {
    pub fn new(options: UserOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl OptionsStore for StaticOptionsStore {
    async fn get_all(&self) -> Result<UserOptions, AppError> {
        Ok(self.options)
    }
}
