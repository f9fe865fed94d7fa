use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::cache::CounterCache;
use crate::errors::{LinkPulseError, Result};
use crate::storage::{MappingStore, TopLink};

pub const DEFAULT_TOP_N: u64 = 10;
pub const MAX_TOP_N: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkAnalytics {
    pub short_key: String,
    pub long_url: String,
    pub click_count: i64,
}

pub struct AnalyticsService {
    store: Arc<dyn MappingStore>,
    cache: Arc<dyn CounterCache>,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn MappingStore>, cache: Arc<dyn CounterCache>) -> Self {
        Self { store, cache }
    }

    /// 点击数优先取实时计数器，未被追踪或读取失败时退回持久化基线
    pub async fn analytics(&self, short_key: &str) -> Result<LinkAnalytics> {
        let mapping = self.store.get(short_key).await?.ok_or_else(|| {
            LinkPulseError::not_found(format!("Short link '{}' not found", short_key))
        })?;

        let click_count = match self.cache.get_clicks(short_key).await {
            Ok(Some(live)) => live,
            Ok(None) => mapping.click_count,
            Err(e) => {
                warn!("Failed to read counter for '{}': {}", short_key, e);
                mapping.click_count
            }
        };

        Ok(LinkAnalytics {
            short_key: mapping.short_key,
            long_url: mapping.long_url,
            click_count,
        })
    }

    /// Durable ranking; live counters show up after the next reconciliation.
    pub async fn top(&self, n: Option<u64>) -> Result<Vec<TopLink>> {
        let n = n.unwrap_or(DEFAULT_TOP_N).clamp(1, MAX_TOP_N);
        self.store.top_n(n).await
    }
}
