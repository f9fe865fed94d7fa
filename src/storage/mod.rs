//! Durable mapping store
//!
//! The relational store is authoritative for the key -> URL mapping and for the
//! click baseline on cold start and after every reconciliation pass.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::SeaOrmStorage;
pub use models::{CreatedMapping, TopLink, UrlMapping, cache_ttl};

#[async_trait]
pub trait MappingStore: Send + Sync {
    /// 原子插入；`short_key` 已存在时返回 `LinkPulseError::Conflict`
    ///
    /// Safe under concurrent identical inserts: the unique index is the only
    /// conflict signal, callers do not need a prior existence check.
    async fn create(
        &self,
        short_key: &str,
        long_url: &str,
        expire_at: Option<DateTime<Utc>>,
    ) -> Result<CreatedMapping>;

    /// `Ok(None)` 表示不存在，`Err` 表示底层故障
    async fn get(&self, short_key: &str) -> Result<Option<UrlMapping>>;

    /// 用快照覆盖点击基线（只被回写任务调用）
    async fn set_click_count(&self, short_key: &str, count: i64) -> Result<()>;

    /// 按 click_count 降序，created_at 升序打破平局
    async fn top_n(&self, n: u64) -> Result<Vec<TopLink>>;

    fn backend_name(&self) -> &str;
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<SeaOrmStorage>> {
        let storage = SeaOrmStorage::new(config).await?;
        Ok(Arc::new(storage))
    }
}
