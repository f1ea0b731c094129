//! Case folder integration tests
//!
//! These exercise both sides of every operation: the database row and the
//! directory on disk.

use std::path::Path;

use serde_json::{json, Value};

use crate::common::fixtures::{create_case_folder, create_customer};
use crate::common::test_app::TestApp;

#[tokio::test]
async fn test_create_case_folder_creates_directory_and_row() {
    let app = TestApp::new().await;
    let customer = create_customer(&app, "Acme Corp").await;

    let folder = create_case_folder(&app, &customer.id, "MS2024-001", "Water damage").await;

    assert_eq!(folder["case_number"], "MS2024-001");
    let path = folder["path"].as_str().unwrap();
    assert!(path.ends_with("MS2024-001_Water damage"));
    assert!(Path::new(path).is_dir());
    assert!(Path::new(path).join("case_info.txt").is_file());

    let list: Vec<Value> = app
        .get(&format!("/api/customers/{}/case-folders", customer.id))
        .await
        .json();
    assert_eq!(list.len(), 1);
}

#[tokio::test]
async fn test_create_case_folder_applies_template_subfolders() {
    let app = TestApp::new().await;
    let customer = create_customer(&app, "Acme Corp").await;

    let response = app
        .post_json(
            &format!("/api/customers/{}/case-folders", customer.id),
            json!({
                "case_number": "MS2024-002",
                "description": "Inspection",
                "template_id": "default",
            }),
        )
        .await;
    response.assert_created();

    let folder: Value = response.json();
    let path = Path::new(folder["path"].as_str().unwrap()).to_path_buf();
    // Subfolders from the seeded default template
    for subfolder in ["Documents", "Images", "Notes"] {
        assert!(path.join(subfolder).is_dir(), "missing {}", subfolder);
    }

    let info = std::fs::read_to_string(path.join("case_info.txt")).unwrap();
    assert!(info.contains("Template: Default Template"));
}

#[tokio::test]
async fn test_create_case_folder_without_ms_prefix_fails_before_any_mutation() {
    let app = TestApp::new().await;
    let customer = create_customer(&app, "Acme Corp").await;

    let response = app
        .post_json(
            &format!("/api/customers/{}/case-folders", customer.id),
            json!({ "case_number": "2024-001", "description": "No prefix" }),
        )
        .await;
    response.assert_validation_error();

    // No directory was created and no row inserted
    let entries: Vec<_> = std::fs::read_dir(&customer.directory).unwrap().collect();
    assert!(entries.is_empty());
    let list: Vec<Value> = app
        .get(&format!("/api/customers/{}/case-folders", customer.id))
        .await
        .json();
    assert!(list.is_empty());
}

#[tokio::test]
async fn test_create_case_folder_twice_conflicts_without_duplicate_row() {
    let app = TestApp::new().await;
    let customer = create_customer(&app, "Acme Corp").await;

    create_case_folder(&app, &customer.id, "MS2024-003", "Repeat").await;

    let response = app
        .post_json(
            &format!("/api/customers/{}/case-folders", customer.id),
            json!({ "case_number": "MS2024-003", "description": "Repeat" }),
        )
        .await;
    response.assert_conflict();

    let list: Vec<Value> = app
        .get(&format!("/api/customers/{}/case-folders", customer.id))
        .await
        .json();
    assert_eq!(list.len(), 1);
}

#[tokio::test]
async fn test_create_case_folder_sanitizes_description() {
    let app = TestApp::new().await;
    let customer = create_customer(&app, "Acme Corp").await;

    let folder = create_case_folder(&app, &customer.id, "MS2024-004", "a/b\\c: d").await;

    let path = folder["path"].as_str().unwrap();
    assert!(path.ends_with("MS2024-004_a_b_c_ d"), "got {}", path);
    assert!(Path::new(path).is_dir());
}

#[tokio::test]
async fn test_move_case_folder_relocates_directory_and_row() {
    let app = TestApp::new().await;
    let source = create_customer(&app, "Source Co").await;
    let target = create_customer(&app, "Target Co").await;

    let folder = create_case_folder(&app, &source.id, "MS2024-005", "Movable").await;
    let folder_name = Path::new(folder["path"].as_str().unwrap())
        .file_name()
        .unwrap()
        .to_string_lossy()
        .to_string();

    let response = app
        .post_json(
            "/api/case-folders/move",
            json!({
                "source_customer_id": source.id,
                "folder_name": folder_name,
                "target_customer_id": target.id,
            }),
        )
        .await;
    response.assert_ok();

    let moved: Value = response.json();
    assert_eq!(moved["customer_id"], target.id.as_str());

    let old_path = Path::new(&source.directory).join(&folder_name);
    let new_path = Path::new(&target.directory).join(&folder_name);
    assert!(!old_path.exists());
    assert!(new_path.is_dir());

    // The manifest records the new owner and the move
    let info = std::fs::read_to_string(new_path.join("case_info.txt")).unwrap();
    assert!(info.contains("Customer: Target Co"));
    assert!(info.contains("Moved from: Source Co"));

    let source_list: Vec<Value> = app
        .get(&format!("/api/customers/{}/case-folders", source.id))
        .await
        .json();
    assert!(source_list.is_empty());
    let target_list: Vec<Value> = app
        .get(&format!("/api/customers/{}/case-folders", target.id))
        .await
        .json();
    assert_eq!(target_list.len(), 1);
}

#[tokio::test]
async fn test_move_case_folder_target_name_collision_mutates_nothing() {
    let app = TestApp::new().await;
    let source = create_customer(&app, "Source Co").await;
    let target = create_customer(&app, "Target Co").await;

    let folder = create_case_folder(&app, &source.id, "MS2024-006", "Collide").await;
    let folder_name = Path::new(folder["path"].as_str().unwrap())
        .file_name()
        .unwrap()
        .to_string_lossy()
        .to_string();

    // Same-named folder already sits in the target directory
    std::fs::create_dir(Path::new(&target.directory).join(&folder_name)).unwrap();

    let response = app
        .post_json(
            "/api/case-folders/move",
            json!({
                "source_customer_id": source.id,
                "folder_name": folder_name,
                "target_customer_id": target.id,
            }),
        )
        .await;
    response.assert_conflict();

    // Folder still at the source, row unchanged
    assert!(Path::new(&source.directory).join(&folder_name).is_dir());
    let source_list: Vec<Value> = app
        .get(&format!("/api/customers/{}/case-folders", source.id))
        .await
        .json();
    assert_eq!(source_list.len(), 1);
    assert_eq!(source_list[0]["customer_id"], source.id.as_str());
}

#[tokio::test]
async fn test_move_case_folder_rolls_back_on_database_failure() {
    let app = TestApp::new().await;
    let source = create_customer(&app, "Source Co").await;
    let target = create_customer(&app, "Target Co").await;

    let folder = create_case_folder(&app, &source.id, "MS2024-007", "Doomed").await;
    let folder_name = Path::new(folder["path"].as_str().unwrap())
        .file_name()
        .unwrap()
        .to_string_lossy()
        .to_string();

    // Force the row update to fail after the filesystem move succeeded
    sqlx::query(
        "CREATE TRIGGER block_case_folder_updates BEFORE UPDATE ON case_folders \
         BEGIN SELECT RAISE(ABORT, 'forced failure'); END",
    )
    .execute(&app.state.db)
    .await
    .unwrap();

    let response = app
        .post_json(
            "/api/case-folders/move",
            json!({
                "source_customer_id": source.id,
                "folder_name": folder_name,
                "target_customer_id": target.id,
            }),
        )
        .await;
    assert!(response.status.is_server_error());

    // The filesystem move was rolled back and the row is unchanged
    assert!(Path::new(&source.directory).join(&folder_name).is_dir());
    assert!(!Path::new(&target.directory).join(&folder_name).exists());

    sqlx::query("DROP TRIGGER block_case_folder_updates")
        .execute(&app.state.db)
        .await
        .unwrap();
    let source_list: Vec<Value> = app
        .get(&format!("/api/customers/{}/case-folders", source.id))
        .await
        .json();
    assert_eq!(source_list.len(), 1);
    assert_eq!(source_list[0]["customer_id"], source.id.as_str());
}

#[tokio::test]
async fn test_open_case_folder_missing_returns_not_found() {
    let app = TestApp::new().await;
    let customer = create_customer(&app, "Acme Corp").await;

    app.post_json(
        "/api/case-folders/open",
        json!({ "customer_id": customer.id, "folder_name": "MS-nope" }),
    )
    .await
    .assert_not_found();
}

#[tokio::test]
async fn test_list_case_folders_for_unknown_customer() {
    let app = TestApp::new().await;
    app.get("/api/customers/00000000-0000-0000-0000-000000000001/case-folders")
        .await
        .assert_not_found();
}
