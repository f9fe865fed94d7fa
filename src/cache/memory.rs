use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use moka::future::Cache;
use moka::policy::Expiry;
use tracing::{debug, trace};

use super::traits::{BaselineFetcher, CounterCache};
use crate::errors::Result;

#[derive(Clone)]
struct UrlEntry {
    long_url: Arc<str>,
    ttl: Duration,
}

/// 每个条目使用写入时给定的 TTL
struct UrlEntryExpiry;

impl Expiry<String, UrlEntry> for UrlEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &UrlEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &UrlEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// 进程内缓存后端
///
/// URL entries live in a moka cache with a per-entry expiry. Counters live in
/// a `DashMap`; seeding and incrementing a cold counter happen under the same
/// shard lock through the entry API, which is the in-process equivalent of
/// `SET NX` followed by `INCR`.
pub struct MemoryCounterCache {
    urls: Cache<String, UrlEntry>,
    counters: DashMap<String, i64>,
}

impl MemoryCounterCache {
    pub fn new(max_capacity: u64) -> Self {
        let urls = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(UrlEntryExpiry)
            .build();

        debug!(
            "MemoryCounterCache initialized with max capacity: {}",
            max_capacity
        );

        Self {
            urls,
            counters: DashMap::new(),
        }
    }
}

impl Default for MemoryCounterCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl CounterCache for MemoryCounterCache {
    async fn get_url(&self, short_key: &str) -> Result<Option<String>> {
        Ok(self
            .urls
            .get(short_key)
            .await
            .map(|entry| entry.long_url.to_string()))
    }

    async fn set_url(&self, short_key: &str, long_url: &str, ttl: Duration) -> Result<()> {
        if ttl.is_zero() {
            trace!("Skipping zero TTL cache entry for {}", short_key);
            return Ok(());
        }

        self.urls
            .insert(
                short_key.to_string(),
                UrlEntry {
                    long_url: Arc::from(long_url),
                    ttl,
                },
            )
            .await;
        Ok(())
    }

    async fn increment_clicks(
        &self,
        short_key: &str,
        fetch_baseline: BaselineFetcher,
    ) -> Result<i64> {
        // 热路径：计数器已存在
        if let Some(mut count) = self.counters.get_mut(short_key) {
            *count += 1;
            return Ok(*count);
        }

        // 冷路径：锁外读取基线，再由 entry API 保证只播种一次
        let baseline = fetch_baseline().await?;
        let mut count = self
            .counters
            .entry(short_key.to_string())
            .or_insert_with(|| {
                trace!("Seeding counter for {} with baseline {}", short_key, baseline);
                baseline
            });
        *count += 1;
        Ok(*count)
    }

    async fn get_clicks(&self, short_key: &str) -> Result<Option<i64>> {
        Ok(self.counters.get(short_key).map(|count| *count))
    }

    async fn list_counter_keys(&self) -> Result<Vec<String>> {
        Ok(self
            .counters
            .iter()
            .map(|entry| entry.key().clone())
            .collect())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
