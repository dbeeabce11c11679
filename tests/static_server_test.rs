//! 静的ファイル配信のテスト

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{self, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use soil_search::error::Result;
use soil_search::proxy::{Upstream, UpstreamCall, UpstreamReply};
use soil_search::server::{build_router, AppState};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

/// 静的配信では呼ばれない
struct UnusedUpstream;

#[async_trait]
impl Upstream for UnusedUpstream {
    async fn identify(&self, _api_key: &str, _call: &UpstreamCall) -> Result<UpstreamReply> {
        panic!("upstream must not be called for static files");
    }
}

fn site() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");
    let root = dir.path();
    std::fs::create_dir_all(root.join("pages")).unwrap();
    std::fs::create_dir_all(root.join("docs")).unwrap();
    std::fs::create_dir_all(root.join("empty")).unwrap();
    std::fs::write(root.join("index.html"), "<html><body>home</body></html>").unwrap();
    std::fs::write(root.join("pages").join("soil-ai.html"), "<main>soil</main>").unwrap();
    std::fs::write(root.join("docs").join("index.html"), "docs index").unwrap();
    std::fs::write(root.join("styles.css"), "body {}").unwrap();
    std::fs::write(root.join("photo.JPG"), [0xff, 0xd8, 0xff]).unwrap();
    std::fs::write(root.join("data.bin"), [1, 2, 3]).unwrap();
    dir
}

fn app(root: &Path) -> Router {
    build_router(AppState {
        root: root.to_path_buf(),
        api_key: None,
        upstream: Arc::new(UnusedUpstream),
    })
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let request = Request::get(uri).body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
        .to_vec();
    (status, content_type, body)
}

#[tokio::test]
async fn test_root_serves_index_html() {
    let dir = site();
    let (status, content_type, body) = get(app(dir.path()), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
    assert_eq!(body, b"<html><body>home</body></html>");
}

#[tokio::test]
async fn test_serves_page_fragment_ignoring_query() {
    let dir = site();
    let (status, _, body) = get(app(dir.path()), "/pages/soil-ai.html?v=3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<main>soil</main>");
}

#[tokio::test]
async fn test_content_type_from_extension_table() {
    let dir = site();

    let (_, css, _) = get(app(dir.path()), "/styles.css").await;
    assert_eq!(css.as_deref(), Some("text/css; charset=utf-8"));

    let (_, jpg, _) = get(app(dir.path()), "/photo.JPG").await;
    assert_eq!(jpg.as_deref(), Some("image/jpeg"));

    let (_, bin, _) = get(app(dir.path()), "/data.bin").await;
    assert_eq!(bin.as_deref(), Some("application/octet-stream"));
}

#[tokio::test]
async fn test_missing_file_returns_404() {
    let dir = site();
    let (status, _, body) = get(app(dir.path()), "/nope.html").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"Not Found");
}

#[tokio::test]
async fn test_directory_serves_its_index() {
    let dir = site();
    let (status, content_type, body) = get(app(dir.path()), "/docs").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
    assert_eq!(body, b"docs index");
}

#[tokio::test]
async fn test_directory_without_index_returns_404() {
    let dir = site();
    let (status, _, _) = get(app(dir.path()), "/empty/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_path_traversal_returns_400() {
    let dir = site();

    let (status, _, body) = get(app(dir.path()), "/%2e%2e/%2e%2e/etc/passwd").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, b"Bad Request");

    let (status, _, _) = get(app(dir.path()), "/pages/%2E%2E/%2E%2E/secret").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_percent_encoded_names_are_decoded() {
    let dir = site();
    std::fs::write(dir.path().join("common plants.html"), "plants").unwrap();

    let (status, _, body) = get(app(dir.path()), "/common%20plants.html").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"plants");
}
