use async_trait::async_trait;
use moka::{Expiry, future::Cache};
use std::{
    fmt::Debug,
    time::{Duration, Instant},
};

use crate::model::WeatherResult;

/// How long a successful lookup is served from the cache.
pub const CACHE_TTL: Duration = Duration::from_secs(1800);

/// Key-value store for finished lookups.
///
/// `get` must report an expired entry as absent whether or not it was
/// physically removed. `put` overwrites unconditionally.
#[async_trait]
pub trait CacheStore: Send + Sync + Debug {
    async fn get(&self, key: &str) -> anyhow::Result<Option<WeatherResult>>;

    async fn put(&self, key: &str, value: WeatherResult, ttl: Duration) -> anyhow::Result<()>;
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: WeatherResult,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with.
struct EntryTtl;

impl Expiry<String, CacheEntry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Process-local store backed by moka, with per-entry TTL and no size bound.
pub struct InMemoryCache {
    entries: Cache<String, CacheEntry>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        let entries = Cache::builder().expire_after(EntryTtl).build();
        Self { entries }
    }

    /// Number of live entries, after pending expirations have been applied.
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for InMemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCache")
            .field("entry_count", &self.entries.entry_count())
            .finish()
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &str) -> anyhow::Result<Option<WeatherResult>> {
        Ok(self.entries.get(key).await.map(|entry| entry.value))
    }

    async fn put(&self, key: &str, value: WeatherResult, ttl: Duration) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), CacheEntry { value, ttl }).await;
        Ok(())
    }
}
