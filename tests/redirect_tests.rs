//! Redirect read path: cache lookup, store fallback, expiry, counting

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use linkpulse::cache::CounterCache;
use linkpulse::errors::LinkPulseError;
use linkpulse::services::{RedirectService, ShortenRequest};
use linkpulse::storage::MappingStore;

use common::{FailingCache, HOUR, TestApp, create_temp_storage};

fn request(long_url: &str) -> ShortenRequest {
    ShortenRequest {
        long_url: long_url.to_string(),
        custom_alias: None,
        expire_at: None,
    }
}

#[tokio::test]
async fn test_shorten_redirect_analytics_scenario() {
    let app = TestApp::new().await;

    let result = app
        .services
        .shorten
        .shorten(request("https://example.com"))
        .await
        .unwrap();

    assert_eq!(result.short_key.len(), 6);
    assert!(result.short_key.chars().all(|c| c.is_ascii_alphanumeric()));

    let target = app.services.redirect.resolve(&result.short_key).await.unwrap();
    assert_eq!(target, "https://example.com");

    let analytics = app
        .services
        .analytics
        .analytics(&result.short_key)
        .await
        .unwrap();
    assert_eq!(analytics.click_count, 1);
    assert_eq!(analytics.long_url, "https://example.com");
}

#[tokio::test]
async fn test_cold_path_counts_and_warms_cache() {
    let app = TestApp::new().await;
    app.store
        .create("cold", "https://example.com/cold", None)
        .await
        .unwrap();

    assert_eq!(app.cache.get_url("cold").await.unwrap(), None);

    let target = app.services.redirect.resolve("cold").await.unwrap();
    assert_eq!(target, "https://example.com/cold");
    assert_eq!(app.cache.get_clicks("cold").await.unwrap(), Some(1));
    assert_eq!(
        app.cache.get_url("cold").await.unwrap().as_deref(),
        Some("https://example.com/cold")
    );

    // 第二次走缓存，同样计数
    app.services.redirect.resolve("cold").await.unwrap();
    assert_eq!(app.cache.get_clicks("cold").await.unwrap(), Some(2));
}

#[tokio::test]
async fn test_cold_counter_seeds_from_durable_baseline() {
    let app = TestApp::new().await;
    app.store
        .create("seeded", "https://example.com", None)
        .await
        .unwrap();
    app.store.set_click_count("seeded", 41).await.unwrap();

    app.services.redirect.resolve("seeded").await.unwrap();

    assert_eq!(app.cache.get_clicks("seeded").await.unwrap(), Some(42));
}

#[tokio::test]
async fn test_expired_mapping_is_gone_and_untouched() {
    let app = TestApp::new().await;
    app.store
        .create(
            "old",
            "https://example.com/old",
            Some(Utc::now() - Duration::minutes(5)),
        )
        .await
        .unwrap();

    let err = app.services.redirect.resolve("old").await.unwrap_err();
    assert!(matches!(err, LinkPulseError::Gone(_)), "got {:?}", err);

    assert_eq!(app.cache.get_url("old").await.unwrap(), None);
    assert_eq!(app.cache.get_clicks("old").await.unwrap(), None);
    assert!(app.cache.list_counter_keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_key_is_not_found() {
    let app = TestApp::new().await;

    let err = app.services.redirect.resolve("nothing").await.unwrap_err();
    assert!(matches!(err, LinkPulseError::NotFound(_)));

    let err = app.services.redirect.resolve("bad key!").await.unwrap_err();
    assert!(matches!(err, LinkPulseError::NotFound(_)));
    assert!(app.cache.list_counter_keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cache_outage_still_redirects() {
    let (store, _dir) = create_temp_storage().await;
    store
        .create("abc", "https://example.com", None)
        .await
        .unwrap();

    let service = RedirectService::new(store.clone(), Arc::new(FailingCache), HOUR);

    let target = service.resolve("abc").await.unwrap();
    assert_eq!(target, "https://example.com");
}

#[tokio::test]
async fn test_cache_outage_keeps_expiry_semantics() {
    let (store, _dir) = create_temp_storage().await;
    store
        .create(
            "old",
            "https://example.com",
            Some(Utc::now() - Duration::seconds(1)),
        )
        .await
        .unwrap();

    let service = RedirectService::new(store.clone(), Arc::new(FailingCache), HOUR);
    let err = service.resolve("old").await.unwrap_err();
    assert!(matches!(err, LinkPulseError::Gone(_)));
}

#[tokio::test]
async fn test_cache_entry_ttl_bounded_by_expiry() {
    let app = TestApp::new().await;
    app.store
        .create(
            "brief",
            "https://example.com",
            Some(Utc::now() + Duration::milliseconds(300)),
        )
        .await
        .unwrap();

    app.services.redirect.resolve("brief").await.unwrap();
    assert!(app.cache.get_url("brief").await.unwrap().is_some());

    tokio::time::sleep(std::time::Duration::from_millis(600)).await;

    // 缓存条目随映射一起过期，回源后得到 Gone
    assert_eq!(app.cache.get_url("brief").await.unwrap(), None);
    let err = app.services.redirect.resolve("brief").await.unwrap_err();
    assert!(matches!(err, LinkPulseError::Gone(_)));
}
