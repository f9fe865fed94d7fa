use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, Script, aio::ConnectionManager};
use tracing::{debug, info, trace};

use super::traits::{BaselineFetcher, CounterCache};
use crate::errors::{LinkPulseError, Result};

/// 计数器存在时 INCR，否则返回 nil（不创建 key）
const INCR_IF_EXISTS: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
    return redis.call('INCR', KEYS[1])
end
return false
"#;

const SCAN_BATCH: usize = 500;

/// Redis 缓存后端
///
/// Key layout: `<prefix>url:<key>` holds the long URL with a millisecond
/// TTL, `<prefix>clicks:<key>` holds the counter without TTL.
///
/// A warm increment is one Lua call. A cold one fetches the baseline, then
/// runs `SET NX` + `INCR` in a single MULTI/EXEC, so only the first seed wins
/// and every caller's increment lands on top of it.
pub struct RedisCounterCache {
    conn: ConnectionManager,
    key_prefix: String,
    incr_if_exists: Script,
}

impl RedisCounterCache {
    pub async fn connect(redis_url: &str, key_prefix: &str) -> Result<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            LinkPulseError::cache_connection(format!("Invalid Redis URL '{}': {}", redis_url, e))
        })?;

        let mut conn = ConnectionManager::new(client).await.map_err(|e| {
            LinkPulseError::cache_connection(format!("Failed to connect to Redis: {}", e))
        })?;

        redis::cmd("PING")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| LinkPulseError::cache_connection(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis (prefix: '{}')", key_prefix);

        Ok(Self {
            conn,
            key_prefix: key_prefix.to_string(),
            incr_if_exists: Script::new(INCR_IF_EXISTS),
        })
    }

    fn url_key(&self, short_key: &str) -> String {
        format!("{}url:{}", self.key_prefix, short_key)
    }

    fn clicks_prefix(&self) -> String {
        format!("{}clicks:", self.key_prefix)
    }

    fn clicks_key(&self, short_key: &str) -> String {
        format!("{}clicks:{}", self.key_prefix, short_key)
    }
}

#[async_trait]
impl CounterCache for RedisCounterCache {
    async fn get_url(&self, short_key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let url: Option<String> = conn.get(self.url_key(short_key)).await?;
        trace!("Redis GET url {} -> hit={}", short_key, url.is_some());
        Ok(url)
    }

    async fn set_url(&self, short_key: &str, long_url: &str, ttl: Duration) -> Result<()> {
        let millis = ttl.as_millis() as u64;
        if millis == 0 {
            trace!("Skipping zero TTL cache entry for {}", short_key);
            return Ok(());
        }

        let mut conn = self.conn.clone();
        redis::cmd("PSETEX")
            .arg(self.url_key(short_key))
            .arg(millis)
            .arg(long_url)
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn increment_clicks(
        &self,
        short_key: &str,
        fetch_baseline: BaselineFetcher,
    ) -> Result<i64> {
        let key = self.clicks_key(short_key);
        let mut conn = self.conn.clone();

        let warm: Option<i64> = self
            .incr_if_exists
            .key(&key)
            .invoke_async(&mut conn)
            .await?;
        if let Some(count) = warm {
            return Ok(count);
        }

        let baseline = fetch_baseline().await?;
        let (count,): (i64,) = redis::pipe()
            .atomic()
            .cmd("SET")
            .arg(&key)
            .arg(baseline)
            .arg("NX")
            .ignore()
            .cmd("INCR")
            .arg(&key)
            .query_async(&mut conn)
            .await?;

        debug!(
            "Counter for {} seeded (baseline {}), now {}",
            short_key, baseline, count
        );
        Ok(count)
    }

    async fn get_clicks(&self, short_key: &str) -> Result<Option<i64>> {
        let mut conn = self.conn.clone();
        let count: Option<i64> = conn.get(self.clicks_key(short_key)).await?;
        Ok(count)
    }

    async fn list_counter_keys(&self) -> Result<Vec<String>> {
        let prefix = self.clicks_prefix();
        let pattern = format!("{}*", prefix);
        let mut conn = self.conn.clone();

        let mut keys = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;

            keys.extend(
                batch
                    .into_iter()
                    .filter_map(|k| k.strip_prefix(&prefix).map(str::to_string)),
            );

            if next == 0 {
                break;
            }
            cursor = next;
        }

        // SCAN 可能重复返回同一个 key
        keys.sort_unstable();
        keys.dedup();
        Ok(keys)
    }

    fn backend_name(&self) -> &str {
        "redis"
    }
}
