//! Directory helper endpoint tests

use serde_json::{json, Value};

use crate::common::test_app::TestApp;

#[tokio::test]
async fn test_validate_directory_existing() {
    let app = TestApp::new().await;
    let dir = tempfile::tempdir().unwrap();

    let response = app
        .post_json(
            "/api/validate-directory",
            json!({ "path": dir.path().to_string_lossy() }),
        )
        .await;
    response.assert_ok();

    let body: Value = response.json();
    assert_eq!(body["valid"], true);
}

#[tokio::test]
async fn test_validate_directory_missing() {
    let app = TestApp::new().await;

    let response = app
        .post_json(
            "/api/validate-directory",
            json!({ "path": "/definitely/not/here" }),
        )
        .await;
    response.assert_ok();

    let body: Value = response.json();
    assert_eq!(body["valid"], false);
}

#[tokio::test]
async fn test_validate_directory_empty_path() {
    let app = TestApp::new().await;

    let body: Value = app
        .post_json("/api/validate-directory", json!({ "path": "" }))
        .await
        .json();
    assert_eq!(body["valid"], false);
    assert_eq!(body["message"], "No path provided");
}

#[tokio::test]
async fn test_create_directory_sanitizes_suggested_name() {
    let app = TestApp::new().await;
    let parent = tempfile::tempdir().unwrap();

    let response = app
        .post_json(
            "/api/create-directory",
            json!({
                "parent_dir": parent.path().to_string_lossy(),
                "suggested_name": "Acme Corp.",
            }),
        )
        .await;
    response.assert_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    let created = body["directory"].as_str().unwrap();
    assert!(created.ends_with("Acme_Corp_"));
    assert!(std::path::Path::new(created).is_dir());
}

#[tokio::test]
async fn test_create_directory_missing_parent_fails() {
    let app = TestApp::new().await;

    let response = app
        .post_json(
            "/api/create-directory",
            json!({ "parent_dir": "/definitely/not/here", "suggested_name": "x" }),
        )
        .await;
    assert!(response.status.is_server_error());
}

#[tokio::test]
async fn test_open_directory_unknown_customer() {
    let app = TestApp::new().await;
    app.post_json(
        "/api/open-directory/00000000-0000-0000-0000-000000000001",
        json!({}),
    )
    .await
    .assert_not_found();
}
