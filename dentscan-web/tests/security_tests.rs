//! Security tests for dentscan-web
//!
//! Tests security-critical features:
//! - Request body limit from `max_upload_bytes`
//! - Uploads cannot escape the upload directory
//! - Retained uploads are the only files served under /uploads

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use dentscan_common::config::TomlConfig;
use dentscan_common::dataset::ReferenceDataset;
use dentscan_common::RecommendationTable;
use dentscan_web::session::SESSION_COOKIE;
use dentscan_web::{build_router, AppState};
use std::path::PathBuf;
use tempfile::TempDir;
use tower::util::ServiceExt;

const BOUNDARY: &str = "dentscan-security-boundary";

/// Test helper: app with a small body limit and a live session
async fn setup_app_with_limit(limit: usize) -> (Router, String, PathBuf, TempDir) {
    let root = tempfile::tempdir().unwrap();
    let upload_dir = root.path().join("uploads");

    let mut config = TomlConfig::default();
    config.upload_dir = upload_dir.clone();
    config.max_upload_bytes = limit;

    let state = AppState::new(&config, RecommendationTable::default(), ReferenceDataset::default());
    let token = state.sessions.create().await;
    let cookie = format!("{}={}", SESSION_COOKIE, token);

    (build_router(state), cookie, upload_dir, root)
}

fn upload_request(cookie: &str, filename: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .unwrap()
}

// =============================================================================
// Body Size Limit
// =============================================================================

/// Bodies over `max_upload_bytes` are refused and nothing is stored
#[tokio::test]
async fn test_body_size_limit() {
    let (app, cookie, upload_dir, _root) = setup_app_with_limit(1024).await;

    let large = vec![b'x'; 8 * 1024];
    let response = app
        .oneshot(upload_request(&cookie, "big.png", &large))
        .await
        .unwrap();

    assert!(
        response.status().is_client_error(),
        "expected 4xx, got {}",
        response.status()
    );
    let stored = std::fs::read_dir(&upload_dir).map(|d| d.count()).unwrap_or(0);
    assert_eq!(stored, 0);
}

// =============================================================================
// Path handling
// =============================================================================

/// Traversal in the client filename stays inside the upload directory
#[tokio::test]
async fn test_traversal_filename_confined() {
    let (app, cookie, upload_dir, root) = setup_app_with_limit(1024 * 1024).await;

    let response = app
        .oneshot(upload_request(&cookie, "../../...png", b"irrelevant"))
        .await
        .unwrap();

    // Stored as "<uuid>_png" inside the upload directory, then deleted by the gate
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(std::fs::read_dir(&upload_dir).unwrap().count(), 0);
    let entries: Vec<_> = std::fs::read_dir(root.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("uploads")]);
}

/// Files outside the upload directory are not reachable through /uploads
#[tokio::test]
async fn test_static_serving_confined_to_upload_dir() {
    let (app, _cookie, upload_dir, root) = setup_app_with_limit(1024).await;
    std::fs::create_dir_all(&upload_dir).unwrap();
    std::fs::write(root.path().join("secret.txt"), "top secret").unwrap();

    let request = Request::builder()
        .uri("/uploads/../secret.txt")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_ne!(response.status(), StatusCode::OK);
}
