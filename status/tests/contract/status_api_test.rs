//! Contract Test: GET /status
//!
//! レスポンスのステータスコードとJSON形状

use crate::support::{build_app, MockDatabase};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use status_plugin::{DatabaseProbe, StatusSettings};
use std::sync::Arc;
use tower::ServiceExt;

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).expect("response body is not JSON");
    (status, json)
}

/// 依存先なし → 200 not_configured
#[tokio::test]
async fn test_status_without_database_returns_not_configured() {
    let app = build_app(StatusSettings::default(), None);

    let (status, body) = get_json(app, "/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "healthy", "database": {"status": "not_configured"}})
    );
}

/// 依存先が正常 → 200 up
#[tokio::test]
async fn test_status_with_healthy_database_returns_up() {
    let db = MockDatabase::healthy();
    let probe: Arc<dyn DatabaseProbe> = db.clone();
    let app = build_app(StatusSettings::default(), Some(probe));

    let (status, body) = get_json(app, "/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "database": {"status": "up"}}));
    assert_eq!(db.calls(), 1);
}

/// 依存先がエラー → 503 down + error
#[tokio::test]
async fn test_status_with_failing_database_returns_503() {
    let probe: Arc<dyn DatabaseProbe> = MockDatabase::failing("connection failed");
    let app = build_app(StatusSettings::default(), Some(probe));

    let (status, body) = get_json(app, "/status").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body,
        json!({
            "status": "unhealthy",
            "database": {"status": "down", "error": "connection failed"}
        })
    );
}

/// 各リクエストは独立して1回ずつプローブする
#[tokio::test]
async fn test_each_request_probes_once() {
    let db = MockDatabase::healthy();
    let probe: Arc<dyn DatabaseProbe> = db.clone();
    let app = build_app(StatusSettings::default(), Some(probe));

    for _ in 0..3 {
        let (status, _) = get_json(app.clone(), "/status").await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(db.calls(), 3);
}

/// 実際のSQLiteプールをプローブする
#[tokio::test]
async fn test_status_with_sqlite_pool() {
    let pool = sqlx::SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    let probe: Arc<dyn DatabaseProbe> = Arc::new(pool.clone());
    let app = build_app(StatusSettings::default(), Some(probe));

    let (status, body) = get_json(app.clone(), "/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"]["status"], "up");

    pool.close().await;

    let (status, body) = get_json(app, "/status").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"]["status"], "down");
    assert!(!body["database"]["error"].as_str().unwrap().is_empty());
}
