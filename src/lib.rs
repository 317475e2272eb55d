//! Read-through caching layer for project metadata
//!
//! Places a Redis-backed cache in front of the authoritative project store:
//! - Deterministic `{resource}:{index}:{value}` key schema
//! - Read-through single-project lookup with opportunistic repopulation
//! - Delete-time invalidation of both index keys under bounded retry
//! - Cache administration: occupancy count, direct delete, aggregate flush
//!
//! Cache failures never fail a user-visible read or delete; a backend outage
//! degrades lookups to the authoritative store and bounds staleness by TTL.

mod config;
mod error;
mod keys;
mod manager;
mod metrics;
mod retry;
mod store;

pub use config::{CacheConfig, DEFAULT_EXPIRE_HOURS};
pub use error::{CacheError, CacheResult, ErrorList};
pub use keys::{ObjectKey, RESOURCE_TYPE_PROJECT};
pub use manager::{CacheAdmin, CachedProjectManager};
pub use metrics::CacheMetrics;
pub use retry::RetryPolicy;
pub use store::{Project, ProjectRef, ProjectStore, Query, StoreError, StoreResult};

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Shared Redis connection manager
pub type SharedRedis = Arc<Mutex<ConnectionManager>>;

/// Key-value cache backend operations the manager consumes.
#[async_trait]
pub trait CacheClient: Send + Sync {
    /// Raw payload stored under `key`. An absent key is
    /// [`CacheError::Miss`].
    async fn fetch(&self, key: &str) -> CacheResult<String>;

    /// Store `value` under `key` for `ttl`, overwriting any previous entry.
    async fn save(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Every key starting with `prefix`. Linear scan over the backend
    /// keyspace, not for hot paths.
    async fn keys(&self, prefix: &str) -> CacheResult<Vec<String>>;
}

/// Redis implementation of [`CacheClient`].
#[derive(Clone)]
pub struct RedisCache {
    redis: SharedRedis,
}

impl RedisCache {
    pub fn new(redis: SharedRedis) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl CacheClient for RedisCache {
    async fn fetch(&self, key: &str) -> CacheResult<String> {
        let mut conn = self.redis.lock().await;
        let value: Option<String> = conn.get(key).await.map_err(CacheError::Redis)?;
        value.ok_or(CacheError::Miss)
    }

    async fn save(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.redis.lock().await;
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs())
            .await
            .map_err(CacheError::Redis)?;

        debug!(key = %key, ttl_secs = ttl.as_secs(), "cache set");
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.redis.lock().await;
        conn.del::<_, ()>(key).await.map_err(CacheError::Redis)?;

        debug!(key = %key, "cache delete");
        Ok(())
    }

    async fn keys(&self, prefix: &str) -> CacheResult<Vec<String>> {
        let mut conn = self.redis.lock().await;
        let pattern = format!("{prefix}*");
        let mut cursor: u64 = 0;
        let mut found = Vec::new();

        loop {
            // SCAN instead of KEYS to avoid blocking the backend
            let (next_cursor, mut batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut *conn)
                .await
                .map_err(CacheError::Redis)?;

            found.append(&mut batch);
            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        debug!(prefix = %prefix, count = found.len(), "cache key scan");
        Ok(found)
    }
}
