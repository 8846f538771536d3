use redis::Client;
use redis::aio::ConnectionManager;

use crate::error::AppError;

/// Create a Redis connection manager for the notification cache and options store.
pub async fn create_redis_pool(redis_url: &str) -> Result<ConnectionManager, AppError> {
    let client = Client::open(redis_url)?;
    let manager = ConnectionManager::new(client).await?;

    tracing::info!("Connected to Redis");
    Ok(manager)
}
