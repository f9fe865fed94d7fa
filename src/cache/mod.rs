//! Volatile cache layer: URL lookup entries and click counters

pub mod memory;
pub mod redis;
pub mod traits;

use std::sync::Arc;

use tracing::info;

use crate::config::CacheConfig;
use crate::errors::{LinkPulseError, Result};

pub use memory::MemoryCounterCache;
pub use self::redis::RedisCounterCache;
pub use traits::{BaselineFetcher, BaselineFuture, CounterCache};

/// 根据配置选择缓存后端
pub struct CacheFactory;

impl CacheFactory {
    pub async fn create(config: &CacheConfig) -> Result<Arc<dyn CounterCache>> {
        let cache: Arc<dyn CounterCache> = match config.cache_type.as_str() {
            "memory" => Arc::new(MemoryCounterCache::new(config.memory.max_capacity)),
            "redis" => Arc::new(
                RedisCounterCache::connect(&config.redis.url, &config.redis.key_prefix).await?,
            ),
            other => {
                return Err(LinkPulseError::validation(format!(
                    "Unknown cache type '{}'. Supported: memory, redis",
                    other
                )));
            }
        };

        info!("Counter cache initialized: {}", cache.backend_name());
        Ok(cache)
    }
}
