//! Counter reconciliation against a real SQLite store

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use linkpulse::analytics::Reconciler;
use linkpulse::cache::{BaselineFetcher, CounterCache, MemoryCounterCache};
use linkpulse::errors::{LinkPulseError, Result};
use linkpulse::runtime::lifetime::shutdown;
use linkpulse::storage::MappingStore;

use common::{FailingCache, TestApp, baseline, create_temp_storage};

#[tokio::test]
async fn test_flush_then_increment_is_not_double_counted() {
    let app = TestApp::new().await;
    app.store
        .create("abc", "https://example.com", None)
        .await
        .unwrap();
    let reconciler = Reconciler::new(app.store.clone(), app.cache.clone());

    for _ in 0..3 {
        app.services.redirect.resolve("abc").await.unwrap();
    }
    let report = reconciler.run_once().await.unwrap();
    assert_eq!(report.flushed, 1);
    assert_eq!(app.durable_count("abc").await, 3);

    for _ in 0..2 {
        app.services.redirect.resolve("abc").await.unwrap();
    }
    // 回写前持久化基线不变
    assert_eq!(app.durable_count("abc").await, 3);

    reconciler.run_once().await.unwrap();
    assert_eq!(app.durable_count("abc").await, 5);

    // 重复回写是幂等的
    reconciler.run_once().await.unwrap();
    assert_eq!(app.durable_count("abc").await, 5);
}

#[tokio::test]
async fn test_restarted_cache_continues_from_flushed_baseline() {
    let app = TestApp::new().await;
    app.store
        .create("abc", "https://example.com", None)
        .await
        .unwrap();

    for _ in 0..4 {
        app.services.redirect.resolve("abc").await.unwrap();
    }
    Reconciler::new(app.store.clone(), app.cache.clone())
        .run_once()
        .await
        .unwrap();

    let (fresh_cache, services) = app.with_fresh_cache();
    services.redirect.resolve("abc").await.unwrap();

    assert_eq!(fresh_cache.get_clicks("abc").await.unwrap(), Some(5));
    let analytics = services.analytics.analytics("abc").await.unwrap();
    assert_eq!(analytics.click_count, 5);
}

/// 指定 key 读取失败的缓存
struct FlakyCache {
    inner: MemoryCounterCache,
    broken_key: &'static str,
}

#[async_trait]
impl CounterCache for FlakyCache {
    async fn get_url(&self, short_key: &str) -> Result<Option<String>> {
        self.inner.get_url(short_key).await
    }

    async fn set_url(&self, short_key: &str, long_url: &str, ttl: Duration) -> Result<()> {
        self.inner.set_url(short_key, long_url, ttl).await
    }

    async fn increment_clicks(
        &self,
        short_key: &str,
        fetch_baseline: BaselineFetcher,
    ) -> Result<i64> {
        self.inner.increment_clicks(short_key, fetch_baseline).await
    }

    async fn get_clicks(&self, short_key: &str) -> Result<Option<i64>> {
        if short_key == self.broken_key {
            return Err(LinkPulseError::cache_operation("read timed out"));
        }
        self.inner.get_clicks(short_key).await
    }

    async fn list_counter_keys(&self) -> Result<Vec<String>> {
        self.inner.list_counter_keys().await
    }

    fn backend_name(&self) -> &str {
        "flaky"
    }
}

#[tokio::test]
async fn test_read_failure_skips_only_that_key() {
    let (store, _dir) = create_temp_storage().await;
    store.create("good", "https://example.com/g", None).await.unwrap();
    store.create("bad", "https://example.com/b", None).await.unwrap();

    let cache = Arc::new(FlakyCache {
        inner: MemoryCounterCache::default(),
        broken_key: "bad",
    });
    cache.increment_clicks("good", baseline(0)).await.unwrap();
    cache.increment_clicks("bad", baseline(0)).await.unwrap();

    let report = Reconciler::new(store.clone(), cache).run_once().await.unwrap();

    assert_eq!(report.scanned, 2);
    assert_eq!(report.flushed, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(store.get("good").await.unwrap().unwrap().click_count, 1);
    assert_eq!(store.get("bad").await.unwrap().unwrap().click_count, 0);
}

#[tokio::test]
async fn test_listing_failure_fails_the_pass() {
    let (store, _dir) = create_temp_storage().await;
    let err = Reconciler::new(store, Arc::new(FailingCache))
        .run_once()
        .await
        .unwrap_err();
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_shutdown_runs_final_pass() {
    let app = TestApp::new().await;
    app.store
        .create("abc", "https://example.com", None)
        .await
        .unwrap();

    let handle =
        Reconciler::new(app.store.clone(), app.cache.clone()).spawn(Duration::from_secs(3600));

    app.services.redirect.resolve("abc").await.unwrap();
    app.services.redirect.resolve("abc").await.unwrap();
    assert_eq!(app.durable_count("abc").await, 0);

    let report = handle.shutdown().await.unwrap();
    assert_eq!(report.flushed, 1);
    assert_eq!(app.durable_count("abc").await, 2);
}

#[tokio::test]
async fn test_background_loop_flushes_on_interval() {
    let app = TestApp::new().await;
    app.store
        .create("abc", "https://example.com", None)
        .await
        .unwrap();
    app.services.redirect.resolve("abc").await.unwrap();

    let handle =
        Reconciler::new(app.store.clone(), app.cache.clone()).spawn(Duration::from_millis(50));

    let mut flushed = false;
    for _ in 0..40 {
        tokio::time::sleep(Duration::from_millis(25)).await;
        if app.durable_count("abc").await == 1 {
            flushed = true;
            break;
        }
    }
    assert!(flushed, "background pass never ran");

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_server_error_exit_still_flushes_counters() {
    let app = TestApp::new().await;
    app.store
        .create("abc", "https://example.com", None)
        .await
        .unwrap();

    let handle =
        Reconciler::new(app.store.clone(), app.cache.clone()).spawn(Duration::from_secs(3600));
    app.services.redirect.resolve("abc").await.unwrap();

    let outcome: anyhow::Result<()> = Err(anyhow::anyhow!("HTTP server failed"));
    let result = shutdown::finish_after(outcome, handle, Duration::from_secs(5)).await;

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "HTTP server failed");
    assert_eq!(app.durable_count("abc").await, 1);
}

#[tokio::test]
async fn test_clean_exit_flushes_and_returns_ok() {
    let app = TestApp::new().await;
    app.store
        .create("abc", "https://example.com", None)
        .await
        .unwrap();

    let handle =
        Reconciler::new(app.store.clone(), app.cache.clone()).spawn(Duration::from_secs(3600));
    app.services.redirect.resolve("abc").await.unwrap();
    app.services.redirect.resolve("abc").await.unwrap();

    shutdown::finish_after(Ok(()), handle, Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(app.durable_count("abc").await, 2);
}
