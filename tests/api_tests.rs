//! HTTP surface tests

mod common;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test};
use chrono::{Duration as ChronoDuration, Utc};
use linkpulse::api::ErrorBody;
use linkpulse::api::services::ShortenResponse;
use linkpulse::storage::{MappingStore, TopLink};
use serde_json::{Value, json};

use common::TestApp;

#[actix_web::test]
async fn test_shorten_redirect_and_analytics() {
    let ctx = TestApp::new().await;
    let app =
        test::init_service(App::new().configure(|cfg| ctx.services.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/shorten")
        .set_json(json!({ "long_url": "https://example.com/a" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: ShortenResponse = test::read_body_json(resp).await;
    assert_eq!(created.short_key.len(), 6);
    assert_eq!(created.short_url, format!("http://sho.rt/{}", created.short_key));

    let req = test::TestRequest::get()
        .uri(&format!("/{}", created.short_key))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "https://example.com/a"
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/analytics/{}", created.short_key))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["click_count"], 1);
    assert_eq!(body["long_url"], "https://example.com/a");
}

#[actix_web::test]
async fn test_duplicate_alias_is_conflict() {
    let ctx = TestApp::new().await;
    let app =
        test::init_service(App::new().configure(|cfg| ctx.services.configure(cfg))).await;

    let payload = json!({ "long_url": "https://example.com", "custom_alias": "promo" });

    let req = test::TestRequest::post()
        .uri("/api/v1/shorten")
        .set_json(&payload)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/v1/shorten")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(body.code, "E003");
}

#[actix_web::test]
async fn test_invalid_requests_are_rejected() {
    let ctx = TestApp::new().await;
    let app =
        test::init_service(App::new().configure(|cfg| ctx.services.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/shorten")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(body.code, "E001");

    let req = test::TestRequest::post()
        .uri("/api/v1/shorten")
        .set_json(json!({ "long_url": "ftp://example.com" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn test_missing_and_expired_links() {
    let ctx = TestApp::new().await;
    ctx.store
        .create(
            "old",
            "https://example.com/old",
            Some(Utc::now() - ChronoDuration::minutes(5)),
        )
        .await
        .unwrap();
    let app =
        test::init_service(App::new().configure(|cfg| ctx.services.configure(cfg))).await;

    let req = test::TestRequest::get().uri("/nothere").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/old").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::GONE);
    assert!(resp.headers().get(header::LOCATION).is_none());

    let req = test::TestRequest::get()
        .uri("/api/v1/analytics/nothere")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn test_top_links_ordering() {
    let ctx = TestApp::new().await;
    for (key, clicks) in [("low", 1), ("high", 9), ("mid", 4)] {
        ctx.store
            .create(key, "https://example.com", None)
            .await
            .unwrap();
        ctx.store.set_click_count(key, clicks).await.unwrap();
    }
    let app =
        test::init_service(App::new().configure(|cfg| ctx.services.configure(cfg))).await;

    let req = test::TestRequest::get().uri("/api/v1/top?n=2").to_request();
    let links: Vec<TopLink> = test::call_and_read_body_json(&app, req).await;
    let keys: Vec<_> = links.iter().map(|l| l.short_key.as_str()).collect();
    assert_eq!(keys, ["high", "mid"]);
    assert_eq!(links[0].click_count, 9);

    let req = test::TestRequest::get().uri("/api/v1/top").to_request();
    let links: Vec<TopLink> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(links.len(), 3);
}

#[actix_web::test]
async fn test_health_check() {
    let ctx = TestApp::new().await;
    let app =
        test::init_service(App::new().configure(|cfg| ctx.services.configure(cfg))).await;

    let req = test::TestRequest::get().uri("/healthz").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cache"], "memory");
}
