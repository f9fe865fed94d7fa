use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::Result;

pub type BaselineFuture = Pin<Box<dyn Future<Output = Result<i64>> + Send>>;

/// 读取持久化点击基线的回调，冷计数器首次被触碰时调用
pub type BaselineFetcher = Box<dyn FnOnce() -> BaselineFuture + Send>;

/// 易失缓存层：URL 查找条目（带 TTL）+ 点击计数器（无 TTL）
///
/// Two logically separate key spaces share one backend: `url:<key>` and
/// `clicks:<key>`. Between reconciliation passes the counter is the source of
/// truth for a key's click count.
#[async_trait]
pub trait CounterCache: Send + Sync {
    /// `Ok(None)` 表示未命中，调用方应回源
    async fn get_url(&self, short_key: &str) -> Result<Option<String>>;

    /// `ttl` 由调用方按 `expire_at` 截断，零值不会被写入
    async fn set_url(&self, short_key: &str, long_url: &str, ttl: Duration) -> Result<()>;

    /// 计数器 +1 并返回新值
    ///
    /// A cold counter is seeded from `fetch_baseline` before the increment.
    /// Concurrent first touches on the same key seed it only once; no
    /// in-process lock is held across the fetch.
    async fn increment_clicks(&self, short_key: &str, fetch_baseline: BaselineFetcher)
    -> Result<i64>;

    /// 当前计数器的值，未被追踪时返回 None
    async fn get_clicks(&self, short_key: &str) -> Result<Option<i64>>;

    /// 所有被追踪计数器的 short_key（仅供回写任务使用）
    async fn list_counter_keys(&self) -> Result<Vec<String>>;

    fn backend_name(&self) -> &str;
}
