//! Contract Test: カスタムエンドポイントパス

use crate::support::build_app;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use status_plugin::{
    Plugin, PluginConfig, PluginError, RouteRegistry, StatusPlugin, StatusSettings,
};
use std::collections::HashMap;
use tower::ServiceExt;

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// カスタムパスを登録するとデフォルトの /status は 404 になる
#[tokio::test]
async fn test_custom_endpoint_replaces_default() {
    let app = build_app(StatusSettings::default().with_endpoint("health"), None);

    let response = get(app.clone(), "/status").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"]["status"], "not_configured");
}

/// ネストしたパスと前後のスラッシュ
#[tokio::test]
async fn test_nested_endpoint_with_slashes() {
    let app = build_app(StatusSettings::default().with_endpoint("/api/status/"), None);

    assert_eq!(get(app.clone(), "/api/status").await.status(), StatusCode::OK);
    assert_eq!(get(app, "/status").await.status(), StatusCode::NOT_FOUND);
}

/// GET 以外は受け付けない
#[tokio::test]
async fn test_post_is_not_allowed() {
    let app = build_app(StatusSettings::default(), None);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

/// ホスト側で既に使われているパスへの登録は起動時エラー
#[tokio::test]
async fn test_registration_conflict_is_reported() {
    let mut routes = RouteRegistry::new();
    routes
        .route("/status", axum::routing::get(|| async { "taken" }))
        .unwrap();

    let mut plugin = StatusPlugin::new();
    plugin.initialize_with_env(PluginConfig::default(), &HashMap::<String, String>::new());

    let err = plugin.register_routes(&mut routes).unwrap_err();
    assert!(matches!(err, PluginError::RouteConflict(path) if path == "/status"));
}

/// ホストの既存ルーターに組み込む場合、既存パスとの衝突はエラーとして返る
#[tokio::test]
async fn test_registration_onto_host_router_reports_conflict() {
    let host = Router::new().route("/status", axum::routing::get(|| async { "host status" }));
    let mut routes = RouteRegistry::from_router(host, ["/status"]);

    let mut plugin = StatusPlugin::new();
    plugin.initialize_with_env(PluginConfig::default(), &HashMap::<String, String>::new());

    let err = plugin.register_routes(&mut routes).unwrap_err();
    assert!(matches!(err, PluginError::RouteConflict(path) if path == "/status"));

    // ホスト側のルートはそのまま残る
    let response = get(routes.into_router(), "/status").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"host status");
}

/// 既存パスと重ならなければホストのルーターと共存する
#[tokio::test]
async fn test_registration_onto_host_router_with_custom_endpoint() {
    let host = Router::new().route("/status", axum::routing::get(|| async { "host status" }));
    let mut routes = RouteRegistry::from_router(host, ["/status"]);

    let mut plugin = StatusPlugin::new();
    let settings = StatusSettings::default().with_endpoint("healthz");
    plugin.initialize_with_env(PluginConfig::new(settings), &HashMap::<String, String>::new());
    plugin.register_routes(&mut routes).unwrap();

    let app = routes.into_router();
    assert_eq!(get(app.clone(), "/status").await.status(), StatusCode::OK);

    let response = get(app, "/healthz").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["database"]["status"], "not_configured");
}
