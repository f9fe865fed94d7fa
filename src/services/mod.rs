//! Service layer for business logic
//!
//! Request-facing operations shared by the HTTP handlers and the CLI. Every
//! service receives its store and cache as constructor arguments.

mod analytics;
mod redirect;
mod shorten;

use std::sync::Arc;

use crate::cache::{BaselineFetcher, BaselineFuture};
use crate::storage::MappingStore;

pub use analytics::{AnalyticsService, DEFAULT_TOP_N, LinkAnalytics, MAX_TOP_N};
pub use redirect::RedirectService;
pub use shorten::{ShortenOptions, ShortenRequest, ShortenResult, ShortenService};

/// 冷计数器的基线来源：映射表中的 click_count（映射不存在时为 0）
pub(crate) fn store_baseline(store: Arc<dyn MappingStore>, short_key: &str) -> BaselineFetcher {
    let short_key = short_key.to_string();
    Box::new(move || {
        Box::pin(async move {
            let baseline = store
                .get(&short_key)
                .await?
                .map(|mapping| mapping.click_count)
                .unwrap_or(0);
            Ok(baseline)
        }) as BaselineFuture
    })
}
