use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 持久化的短链接映射
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlMapping {
    pub id: i64,
    pub short_key: String,
    pub long_url: String,
    /// 持久化的点击基线，仅由回写任务覆盖
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub expire_at: Option<DateTime<Utc>>,
}

impl UrlMapping {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expire_at.is_some_and(|expire_at| expire_at <= now)
    }

    /// 计算 URL 缓存的 TTL，已过期返回 None
    pub fn cache_ttl(&self, default_ttl: Duration, now: DateTime<Utc>) -> Option<Duration> {
        cache_ttl(self.expire_at, default_ttl, now)
    }
}

/// TTL for a cached URL entry.
///
/// Without `expire_at` the default window applies; otherwise the TTL is the
/// smaller of the default window and the mapping's remaining lifetime, so a
/// cache entry never outlives its mapping. Returns `None` once the mapping has
/// expired: such mappings must not be cached at all.
pub fn cache_ttl(
    expire_at: Option<DateTime<Utc>>,
    default_ttl: Duration,
    now: DateTime<Utc>,
) -> Option<Duration> {
    match expire_at {
        None => Some(default_ttl),
        Some(expire_at) if expire_at <= now => None,
        Some(expire_at) => {
            let remaining = (expire_at - now).to_std().ok()?;
            Some(remaining.min(default_ttl))
        }
    }
}

/// `create` 的返回值：数据库分配的 id 与创建时间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedMapping {
    pub id: i64,
    pub created_at: DateTime<Utc>,
}

/// Top N 查询结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopLink {
    pub short_key: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_at: Option<DateTime<Utc>>,
}
