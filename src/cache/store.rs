use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};

use crate::errors::AppResult;

/// String key-value store with per-entry expiry. The one seam between the
/// caching policy and Redis, so tests can swap in an in-memory fake.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_secs: u64) -> AppResult<()>;
    /// Deleting an absent key is a no-op, not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;
}

#[derive(Clone)]
pub struct RedisCacheStore {
    conn: ConnectionManager,
}

impl RedisCacheStore {
    /// Connects eagerly and verifies the server answers a PING.
    pub async fn connect(redis_url: &str) -> AppResult<Self> {
        let client = redis::Client::open(redis_url)?;
        let mut conn = ConnectionManager::new(client).await?;

        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        log::info!("Connected to Redis");

        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        // ConnectionManager is a cheap handle; clone per operation
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_secs: u64) -> AppResult<()> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }
}
