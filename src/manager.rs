//! Cached project manager
//!
//! The decorator over the authoritative store. Single-project lookups go
//! through the cache; every other store operation passes through verbatim so
//! the augmented behavior stays auditable per method.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult, ErrorList};
use crate::keys::{ObjectKey, RESOURCE_TYPE_PROJECT};
use crate::metrics::CacheMetrics;
use crate::retry::RetryPolicy;
use crate::store::{Project, ProjectRef, ProjectStore, Query, StoreError, StoreResult};
use crate::CacheClient;

/// Cache administration surface of a cached manager.
#[async_trait]
pub trait CacheAdmin: Send + Sync {
    /// Resource-type string prefixing every key this manager owns.
    fn resource_type(&self) -> &str;

    /// Number of keys currently under the resource-type prefix.
    ///
    /// Approximate occupancy, not a live-project count: entries may be
    /// pending expiry, and one project holds zero, one, or two entries.
    async fn count_cache(&self) -> CacheResult<u64>;

    /// Delete one arbitrary key. No check that it belongs to a live project.
    async fn delete_cache(&self, key: &str) -> CacheResult<()>;

    /// Delete every key under the resource-type prefix, continuing past
    /// individual failures and returning them aggregated.
    async fn flush_all(&self) -> CacheResult<()>;
}

/// Read-through caching decorator over a [`ProjectStore`].
///
/// Holds no mutable state; safe for unsynchronized concurrent use. A lookup
/// racing a delete can repopulate a key for a just-deleted project; that
/// entry lives at most one TTL.
pub struct CachedProjectManager<C, S> {
    /// Delegate performing the raw CRUD.
    delegator: S,
    cache: C,
    key_builder: ObjectKey,
    /// TTL applied to every cache save.
    lifetime: Duration,
    /// Policy for delete-time invalidation.
    retry: RetryPolicy,
    metrics: CacheMetrics,
}

impl<C, S> CachedProjectManager<C, S>
where
    C: CacheClient,
    S: ProjectStore,
{
    pub fn new(delegator: S, cache: C, config: &CacheConfig) -> Self {
        Self {
            delegator,
            cache,
            key_builder: ObjectKey::new(RESOURCE_TYPE_PROJECT),
            lifetime: config.lifetime(),
            retry: RetryPolicy::default(),
            metrics: CacheMetrics::new(),
        }
    }

    /// Replace the invalidation retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Remove both index keys of a deleted project.
    ///
    /// Runs only after the authoritative delete has committed, so each key
    /// delete is retried; an exhausted retry leaves a stale entry that
    /// expires with the TTL.
    async fn clean_up(&self, project: &Project) {
        let indexes = [
            ProjectRef::Id(project.project_id),
            ProjectRef::Name(project.name.clone()),
        ];

        for index in indexes {
            let key = match self.key_builder.format(&index) {
                Ok(key) => key,
                Err(e) => {
                    error!(index = %index, error = %e, "format project cache key failed");
                    continue;
                }
            };

            match self.retry.run(|| self.cache.delete(&key)).await {
                Ok(()) => self.metrics.record_invalidation(&key),
                Err(e) => {
                    self.metrics.record_error(&key, "invalidate");
                    error!(key = %key, error = %e, "delete project cache key failed");
                }
            }
        }
    }
}

#[async_trait]
impl<C, S> ProjectStore for CachedProjectManager<C, S>
where
    C: CacheClient,
    S: ProjectStore,
{
    async fn create(&self, project: &Project) -> StoreResult<i64> {
        // population waits for the first lookup
        self.delegator.create(project).await
    }

    async fn count(&self, query: &Query) -> StoreResult<i64> {
        self.delegator.count(query).await
    }

    async fn list(&self, query: &Query) -> StoreResult<Vec<Project>> {
        self.delegator.list(query).await
    }

    async fn list_roles(
        &self,
        project_id: i64,
        user_id: i64,
        group_ids: &[i64],
    ) -> StoreResult<Vec<i32>> {
        self.delegator.list_roles(project_id, user_id, group_ids).await
    }

    async fn get(&self, id_or_name: ProjectRef) -> StoreResult<Project> {
        let key = self
            .key_builder
            .format(&id_or_name)
            .map_err(|e| StoreError::InvalidArgument(e.to_string()))?;

        match self.cache.fetch(&key).await {
            Ok(raw) => match serde_json::from_str::<Project>(&raw) {
                Ok(project) => {
                    debug!(key = %key, "project cache hit");
                    self.metrics.record_hit(&key);
                    return Ok(project);
                }
                Err(e) => {
                    // falls through like a miss, but stays visible to
                    // operators as an error
                    warn!(key = %key, error = %e, "project cache entry undecodable");
                    self.metrics.record_error(&key, "decode");
                }
            },
            Err(CacheError::Miss) => {
                debug!(key = %key, "project cache miss");
                self.metrics.record_miss(&key);
            }
            Err(e) => {
                warn!(key = %key, error = %e, "project cache fetch failed");
                self.metrics.record_error(&key, "fetch");
            }
        }

        let project = self.delegator.get(id_or_name).await?;

        match serde_json::to_string(&project) {
            Ok(raw) => {
                if let Err(e) = self.cache.save(&key, &raw, self.lifetime).await {
                    warn!(key = %key, error = %e, "save project to cache failed");
                    self.metrics.record_error(&key, "save");
                } else {
                    self.metrics.record_write(&key);
                }
            }
            Err(e) => {
                warn!(key = %key, error = %e, "encode project for cache failed");
                self.metrics.record_error(&key, "encode");
            }
        }

        Ok(project)
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        // snapshot first: the name index key cannot be rebuilt once the
        // record is gone
        let project = self.get(ProjectRef::Id(id)).await?;

        self.delegator.delete(id).await?;

        self.clean_up(&project).await;
        Ok(())
    }
}

#[async_trait]
impl<C, S> CacheAdmin for CachedProjectManager<C, S>
where
    C: CacheClient,
    S: ProjectStore,
{
    fn resource_type(&self) -> &str {
        self.key_builder.resource_type()
    }

    async fn count_cache(&self) -> CacheResult<u64> {
        let keys = self.cache.keys(&self.key_builder.prefix()).await?;
        Ok(keys.len() as u64)
    }

    async fn delete_cache(&self, key: &str) -> CacheResult<()> {
        self.cache.delete(key).await
    }

    async fn flush_all(&self) -> CacheResult<()> {
        let keys = self.cache.keys(&self.key_builder.prefix()).await?;

        let mut failures = ErrorList::new();
        for key in &keys {
            if let Err(e) = self.cache.delete(key).await {
                warn!(key = %key, error = %e, "flush: delete cache key failed");
                failures.push(e);
            }
        }

        debug!(total = keys.len(), failed = failures.len(), "project cache flush");
        failures.into_result()
    }
}
