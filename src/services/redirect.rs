use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, trace, warn};

use super::store_baseline;
use crate::cache::CounterCache;
use crate::errors::{LinkPulseError, Result};
use crate::storage::MappingStore;
use crate::utils::is_valid_short_key;

/// 读路径：缓存 -> 数据库回源 -> 过期检查 -> 回填缓存 -> 计数
///
/// Every successful resolution counts exactly one click, on the cached and
/// the cold path alike. Counting and cache warming are best-effort.
pub struct RedirectService {
    store: Arc<dyn MappingStore>,
    cache: Arc<dyn CounterCache>,
    default_ttl: Duration,
}

impl RedirectService {
    pub fn new(
        store: Arc<dyn MappingStore>,
        cache: Arc<dyn CounterCache>,
        default_ttl: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            default_ttl,
        }
    }

    /// 返回跳转目标
    pub async fn resolve(&self, short_key: &str) -> Result<String> {
        if !is_valid_short_key(short_key) {
            trace!("Invalid short key rejected: {}", short_key);
            return Err(Self::not_found(short_key));
        }

        match self.cache.get_url(short_key).await {
            Ok(Some(long_url)) => {
                trace!("Cache hit: {}", short_key);
                self.count_click(short_key).await;
                return Ok(long_url);
            }
            Ok(None) => trace!("Cache miss: {}", short_key),
            Err(e) => warn!("Cache lookup failed for '{}', using store: {}", short_key, e),
        }

        let mapping = self
            .store
            .get(short_key)
            .await?
            .ok_or_else(|| Self::not_found(short_key))?;

        let now = Utc::now();
        let Some(ttl) = mapping.cache_ttl(self.default_ttl, now) else {
            debug!("Link '{}' expired at {:?}", short_key, mapping.expire_at);
            return Err(LinkPulseError::gone(format!(
                "Short link '{}' has expired",
                short_key
            )));
        };

        self.count_click(short_key).await;

        if let Err(e) = self.cache.set_url(short_key, &mapping.long_url, ttl).await {
            warn!("Failed to warm cache for '{}': {}", short_key, e);
        }

        Ok(mapping.long_url)
    }

    async fn count_click(&self, short_key: &str) {
        let fetch_baseline = store_baseline(self.store.clone(), short_key);
        match self.cache.increment_clicks(short_key, fetch_baseline).await {
            Ok(count) => trace!("Click counted for '{}': {}", short_key, count),
            Err(e) => warn!("Failed to count click for '{}': {}", short_key, e),
        }
    }

    fn not_found(short_key: &str) -> LinkPulseError {
        LinkPulseError::not_found(format!("Short link '{}' not found", short_key))
    }
}
