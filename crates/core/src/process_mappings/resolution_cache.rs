//! Memoized resolution results.
//!
//! Backed by a bounded `moka` cache. Concurrent cold lookups of one key are
//! coalesced into a single resolution, and a `None` value is cached too, so a
//! miss is only paid once until the next invalidation or eviction.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, warn};
use moka::future::Cache;

use super::process_mappings_model::{ProcessMapping, ResolutionKey};
use crate::errors::{Error, Result};

/// Upper bound on cached resolutions when none is configured.
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

pub struct ResolutionCache {
    entries: Cache<ResolutionKey, Option<ProcessMapping>>,
    // Bumped on every invalidation so in-flight resolutions can tell they raced one.
    generation: AtomicU64,
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity)
            .support_invalidation_closures()
            .build();
        Self {
            entries,
            generation: AtomicU64::new(0),
        }
    }

    /// `Some(None)` is a cached "no mapping", `None` a cache miss.
    pub async fn get(&self, key: &ResolutionKey) -> Option<Option<ProcessMapping>> {
        self.entries.get(key).await
    }

    pub async fn put(&self, key: ResolutionKey, value: Option<ProcessMapping>) {
        self.entries.insert(key, value).await;
    }

    /// Returns the cached value for `key`, running `resolve` at most once
    /// across concurrent callers when it is missing. Errors are not cached.
    pub async fn get_or_resolve<F, Fut>(
        &self,
        key: ResolutionKey,
        resolve: F,
    ) -> Result<Option<ProcessMapping>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<ProcessMapping>>>,
    {
        let generation = self.generation.load(Ordering::SeqCst);
        let value = self
            .entries
            .try_get_with(key.clone(), resolve())
            .await
            .map_err(|err| Error::clone(&err))?;
        // A value read before an invalidation may predate the write behind it.
        if self.generation.load(Ordering::SeqCst) != generation {
            self.entries.invalidate(&key).await;
        }
        Ok(value)
    }

    /// Drops entries keyed under `tenant_id`, or every entry when it is `None`.
    /// Returns the number of removed keys.
    pub fn invalidate(&self, tenant_id: Option<&str>) -> usize {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let removed = match tenant_id {
            Some(tenant) => {
                let removed = self
                    .entries
                    .iter()
                    .filter(|(key, _)| key.tenant_id.as_deref() == Some(tenant))
                    .count();
                let tenant = tenant.to_string();
                let matches_tenant =
                    move |key: &ResolutionKey, _: &Option<ProcessMapping>| {
                        key.tenant_id.as_deref() == Some(tenant.as_str())
                    };
                if let Err(err) = self.entries.invalidate_entries_if(matches_tenant) {
                    warn!("Tenant invalidation unavailable, clearing all resolutions: {}", err);
                    let all = self.entries.iter().count();
                    self.entries.invalidate_all();
                    return all;
                }
                removed
            }
            None => {
                let removed = self.entries.iter().count();
                self.entries.invalidate_all();
                removed
            }
        };
        debug!(
            "Invalidated {} cached resolution(s) for tenant {:?}",
            removed, tenant_id
        );
        removed
    }

    /// Number of live cached resolutions, after pending evictions are applied.
    pub async fn len(&self) -> usize {
        self.entries.run_pending_tasks().await;
        self.entries.iter().count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn capacity(&self) -> Option<u64> {
        self.entries.policy().max_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DatabaseError;
    use crate::process_mappings::mapping_resolver::test_support::mapping;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::time::Duration;

    fn key(tenant: Option<&str>) -> ResolutionKey {
        let key = ResolutionKey::new("createAccount");
        match tenant {
            Some(t) => key.for_tenant(t),
            None => key,
        }
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = ResolutionCache::new();
        let value = mapping("m", Some("T1"), None, None, "p");
        cache.put(key(Some("T1")), Some(value.clone())).await;
        assert_eq!(cache.get(&key(Some("T1"))).await, Some(Some(value)));
        assert_eq!(cache.get(&key(Some("T2"))).await, None);
    }

    #[tokio::test]
    async fn test_negative_entry_is_distinct_from_miss() {
        let cache = ResolutionCache::new();
        cache.put(key(Some("T1")), None).await;
        assert_eq!(cache.get(&key(Some("T1"))).await, Some(None));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_absent_field_is_not_empty_string() {
        let cache = ResolutionCache::new();
        cache.put(key(Some("T1")), None).await;
        let empty_product = key(Some("T1")).with_product("");
        assert_eq!(cache.get(&empty_product).await, None);
    }

    #[tokio::test]
    async fn test_tenant_invalidation_is_partial() {
        let cache = ResolutionCache::new();
        cache.put(key(Some("T1")), None).await;
        cache.put(key(Some("T1")).with_channel("WEB"), None).await;
        cache.put(key(Some("T2")), None).await;
        cache.put(key(None), None).await;

        assert_eq!(cache.invalidate(Some("T1")), 2);
        assert_eq!(cache.get(&key(Some("T1"))).await, None);
        assert_eq!(cache.get(&key(Some("T1")).with_channel("WEB")).await, None);
        assert_eq!(cache.get(&key(Some("T2"))).await, Some(None));
        assert_eq!(cache.get(&key(None)).await, Some(None));
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_global_invalidation_clears_everything() {
        let cache = ResolutionCache::new();
        cache.put(key(Some("T1")), None).await;
        cache.put(key(None), None).await;
        assert_eq!(cache.invalidate(None), 2);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_entry_count_stays_within_capacity() {
        let capacity = 16;
        let cache = ResolutionCache::with_capacity(capacity);
        assert_eq!(cache.capacity(), Some(capacity));

        for i in 0..200 {
            let tenant = format!("T{}", i);
            cache.put(key(Some(&tenant)), None).await;
        }

        assert!(cache.len().await as u64 <= capacity);
        assert!(cache.entries.entry_count() <= capacity);
    }

    #[tokio::test]
    async fn test_get_or_resolve_runs_once() {
        let cache = ResolutionCache::new();
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            let result = cache
                .get_or_resolve(key(Some("T1")), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(None)
                })
                .await
                .unwrap();
            assert!(result.is_none());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = ResolutionCache::new();
        let failed = cache
            .get_or_resolve(key(Some("T1")), || async {
                Err(Error::LookupFailed(DatabaseError::QueryFailed("boom".into())))
            })
            .await;
        assert!(matches!(failed, Err(Error::LookupFailed(_))));
        assert!(cache.is_empty().await);

        let value = mapping("m", Some("T1"), None, None, "p");
        let resolved = cache
            .get_or_resolve(key(Some("T1")), || async { Ok(Some(value.clone())) })
            .await
            .unwrap();
        assert_eq!(resolved, Some(value));
    }

    #[tokio::test]
    async fn test_resolution_racing_invalidation_is_not_kept() {
        let cache = ResolutionCache::new();
        let value = mapping("m", Some("T1"), None, None, "p");

        let resolved = cache
            .get_or_resolve(key(Some("T1")), || async {
                // A write lands while the store read is in flight.
                cache.invalidate(Some("T1"));
                Ok(Some(value.clone()))
            })
            .await
            .unwrap();

        assert_eq!(resolved, Some(value));
        assert_eq!(cache.get(&key(Some("T1"))).await, None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_cold_resolutions_share_one_query() {
        let cache = Arc::new(ResolutionCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                let calls = calls.clone();
                tokio::spawn(async move {
                    cache
                        .get_or_resolve(key(Some("T1")), || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(20)).await;
                            Ok(None)
                        })
                        .await
                })
            })
            .collect();

        for result in futures::future::join_all(tasks).await {
            assert!(result.unwrap().unwrap().is_none());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
