//! Router tests for pages and the JSON API.
//!
//! Requests go through the full application router using an in-process
//! `axum-test` server. Middleware headers are covered by the integration
//! test crate against a bound listener.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use dabot_storefront::config::{DataSourceConfig, RemoteDataConfig, StorefrontConfig};
use dabot_storefront::state::AppState;
use serde_json::{Value, json};

fn fixture_server() -> TestServer {
    TestServer::new(dabot_storefront::app(AppState::new(StorefrontConfig::local())))
}

/// A server whose data backend refuses connections.
fn unreachable_server() -> TestServer {
    let config = StorefrontConfig {
        data: DataSourceConfig::Remote(RemoteDataConfig {
            endpoint: "http://127.0.0.1:9/graphql".parse().unwrap(),
            api_key: "unused-test-key".into(),
            cache_ttl: Duration::from_secs(60),
        }),
        ..StorefrontConfig::local()
    };
    TestServer::new(dabot_storefront::app(AppState::new(config)))
}

fn store_names(body: &Value) -> Vec<&str> {
    body["stores"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health() {
    let server = fixture_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "ok");

    server.get("/health/ready").await.assert_status_ok();
}

#[tokio::test]
async fn test_readiness_fails_without_backend() {
    let server = unreachable_server();
    server
        .get("/health/ready")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

// ============================================================================
// JSON API
// ============================================================================

#[tokio::test]
async fn test_api_list_stores() {
    let server = fixture_server();
    let response = server.get("/api/stores").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["stores"].as_array().unwrap().len(), 8);
    assert!(body.get("seq").is_none());
    assert!(body["stores"][0].get("nameJa").is_some());
}

#[tokio::test]
async fn test_api_search_by_area_and_brand() {
    let server = fixture_server();
    let response = server
        .post("/api/stores/search")
        .json(&json!({ "area": "関西", "brands": ["POLAR"], "seq": 12 }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(store_names(&body), vec!["COVERAGE"]);
    assert_eq!(body["seq"], 12);
}

#[tokio::test]
async fn test_api_search_sorts_by_open_year() {
    let server = fixture_server();
    let body: Value = server
        .post("/api/stores/search")
        .json(&json!({ "prefecture": "大阪府", "sort": "year-desc" }))
        .await
        .json();
    assert_eq!(store_names(&body), vec!["HOOP OSAKA", "COVERAGE"]);
}

#[tokio::test]
async fn test_api_search_invalid_body_lists_everything() {
    let server = fixture_server();
    let response = server.post("/api/stores/search").text("{not json").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["stores"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn test_api_search_backend_failure() {
    let server = unreachable_server();
    let response = server
        .post("/api/stores/search")
        .json(&json!({ "keyword": "osaka", "seq": 4 }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({
        "stores": [],
        "error": "Failed to fetch stores",
        "seq": 4
    }));
}

#[tokio::test]
async fn test_api_list_stores_backend_failure() {
    let server = unreachable_server();
    let response = server.get("/api/stores").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({ "stores": [], "error": "Failed to fetch stores" }));
}

#[tokio::test]
async fn test_api_brand_lookup_case_insensitive() {
    let server = fixture_server();
    for id in ["ftc", "FTC"] {
        let response = server.get(&format!("/api/brands/{id}")).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["name"], "FTC");
        assert_eq!(body["category"], "Skateboard / Streetwear");
    }
}

#[tokio::test]
async fn test_api_brand_not_found() {
    let server = fixture_server();
    let response = server.get("/api/brands/nonexistent").await;
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({ "error": "Brand not found" }));
}

#[tokio::test]
async fn test_api_list_brands_with_sort() {
    let server = fixture_server();
    let body: Value = server.get("/api/brands?sort=name-desc").await.json();
    let names: Vec<&str> = body["brands"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.first(), Some(&"YARDSALE"));
    assert_eq!(names.last(), Some(&"BUTTER"));
}

// ============================================================================
// Pages
// ============================================================================

#[tokio::test]
async fn test_home_page() {
    let server = fixture_server();
    let response = server.get("/").await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("DABOT"));
    assert!(html.contains("/brands/yardsale"));
}

#[tokio::test]
async fn test_stores_page_filters_by_area() {
    let server = fixture_server();
    // area=関西
    let response = server.get("/stores?area=%E9%96%A2%E8%A5%BF").await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("COVERAGE"));
    assert!(html.contains("HOOP OSAKA"));
    assert!(!html.contains("SPOTAKA"));
}

#[tokio::test]
async fn test_stores_page_backend_failure() {
    let server = unreachable_server();
    let response = server.get("/stores").await;
    response.assert_status_ok();
    assert!(response.text().contains("店舗データの取得に失敗しました"));
}

#[tokio::test]
async fn test_brands_page_keyword() {
    let server = fixture_server();
    let html = server.get("/brands?keyword=obey").await.text();
    assert!(html.contains("/brands/obey"));
    assert!(!html.contains("/brands/polar"));
}

#[tokio::test]
async fn test_brand_detail_lists_carrying_stores() {
    let server = fixture_server();
    let response = server.get("/brands/FTC").await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("FTC TOKYO"));
    assert!(html.contains("HOOP OSAKA"));
    assert!(!html.contains("SPOTAKA"));
}

#[tokio::test]
async fn test_brand_detail_not_found() {
    let server = fixture_server();
    let response = server.get("/brands/nonexistent").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert!(response.text().contains("ブランドが見つかりませんでした"));
}

#[tokio::test]
async fn test_unknown_path_not_found() {
    let server = fixture_server();
    server
        .get("/mypage")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
