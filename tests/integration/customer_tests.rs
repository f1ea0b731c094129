//! Customer CRUD integration tests

use serde_json::{json, Value};

use crate::common::fixtures::create_customer;
use crate::common::test_app::TestApp;

#[tokio::test]
async fn test_create_customer_returns_created_record() {
    let app = TestApp::new().await;
    let customer = create_customer(&app, "Acme Corp").await;

    let response = app.get(&format!("/api/customers/{}", customer.id)).await;
    response.assert_ok();

    let body: Value = response.json();
    assert_eq!(body["name"], "Acme Corp");
    assert_eq!(body["directory"], customer.directory.as_str());
    assert!(body["created_at"].is_string());
    assert!(body["updated_at"].is_null());
}

#[tokio::test]
async fn test_create_customer_empty_name_fails_validation() {
    let app = TestApp::new().await;

    let response = app
        .post_json(
            "/api/customers",
            json!({ "name": "  ", "directory": "/tmp/somewhere" }),
        )
        .await;
    response.assert_validation_error();

    // Nothing reached storage
    let list: Vec<Value> = app.get("/api/customers").await.json();
    assert!(list.is_empty());
}

#[tokio::test]
async fn test_create_customer_empty_directory_fails_validation() {
    let app = TestApp::new().await;

    let response = app
        .post_json("/api/customers", json!({ "name": "Acme", "directory": "" }))
        .await;
    response.assert_validation_error();

    let list: Vec<Value> = app.get("/api/customers").await.json();
    assert!(list.is_empty());
}

#[tokio::test]
async fn test_duplicate_directory_conflicts_and_keeps_one_row() {
    let app = TestApp::new().await;
    let customer = create_customer(&app, "First").await;

    let response = app
        .post_json(
            "/api/customers",
            json!({ "name": "Second", "directory": customer.directory }),
        )
        .await;
    response.assert_conflict();
    assert!(response.text().contains("directory"));

    let list: Vec<Value> = app.get("/api/customers").await.json();
    let matching: Vec<_> = list
        .iter()
        .filter(|c| c["directory"] == customer.directory.as_str())
        .collect();
    assert_eq!(matching.len(), 1);
}

#[tokio::test]
async fn test_get_customer_not_found() {
    let app = TestApp::new().await;
    app.get("/api/customers/00000000-0000-0000-0000-000000000001")
        .await
        .assert_not_found();
}

#[tokio::test]
async fn test_get_customer_invalid_id() {
    let app = TestApp::new().await;
    app.get("/api/customers/not-a-uuid")
        .await
        .assert_bad_request();
}

#[tokio::test]
async fn test_update_customer_partial_fields() {
    let app = TestApp::new().await;
    let customer = create_customer(&app, "Acme Corp").await;

    let response = app
        .put_json(
            &format!("/api/customers/{}", customer.id),
            json!({ "phone": "555-0100", "notes": "priority client" }),
        )
        .await;
    response.assert_ok();

    let body: Value = response.json();
    assert_eq!(body["phone"], "555-0100");
    assert_eq!(body["notes"], "priority client");
    // Untouched fields survive
    assert_eq!(body["name"], "Acme Corp");
    assert!(body["updated_at"].is_string());
}

#[tokio::test]
async fn test_update_customer_empty_body_is_bad_request() {
    let app = TestApp::new().await;
    let customer = create_customer(&app, "Acme Corp").await;

    app.put_json(&format!("/api/customers/{}", customer.id), json!({}))
        .await
        .assert_bad_request();
}

#[tokio::test]
async fn test_rename_customer_changes_name() {
    let app = TestApp::new().await;
    let customer = create_customer(&app, "Old Name").await;

    let response = app
        .post_json(
            &format!("/api/customers/{}/rename", customer.id),
            json!({ "new_name": "  New Name  " }),
        )
        .await;
    response.assert_ok();

    let body: Value = response.json();
    assert_eq!(body["renamed"], true);
    assert_eq!(body["customer"]["name"], "New Name");
    assert!(body["customer"]["updated_at"].is_string());
}

#[tokio::test]
async fn test_rename_customer_same_name_is_noop() {
    let app = TestApp::new().await;
    let customer = create_customer(&app, "Acme Corp").await;

    let response = app
        .post_json(
            &format!("/api/customers/{}/rename", customer.id),
            json!({ "new_name": " Acme Corp " }),
        )
        .await;
    response.assert_ok();

    let body: Value = response.json();
    assert_eq!(body["renamed"], false);
    // The no-op leaves updated_at untouched
    assert!(body["customer"]["updated_at"].is_null());
}

#[tokio::test]
async fn test_rename_customer_empty_name_fails_validation() {
    let app = TestApp::new().await;
    let customer = create_customer(&app, "Acme Corp").await;

    app.post_json(
        &format!("/api/customers/{}/rename", customer.id),
        json!({ "new_name": "   " }),
    )
    .await
    .assert_validation_error();
}

#[tokio::test]
async fn test_delete_customer_removes_record() {
    let app = TestApp::new().await;
    let customer = create_customer(&app, "Acme Corp").await;

    app.delete(&format!("/api/customers/{}", customer.id))
        .await
        .assert_ok();

    app.get(&format!("/api/customers/{}", customer.id))
        .await
        .assert_not_found();
}

#[tokio::test]
async fn test_delete_customer_not_found() {
    let app = TestApp::new().await;
    app.delete("/api/customers/00000000-0000-0000-0000-000000000001")
        .await
        .assert_not_found();
}

#[tokio::test]
async fn test_list_customers_with_search_filter() {
    let app = TestApp::new().await;
    let _acme = create_customer(&app, "Acme Corp").await;
    let _globex = create_customer(&app, "Globex Inc").await;

    let list: Vec<Value> = app.get("/api/customers?search=Globex").await.json();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "Globex Inc");

    let all: Vec<Value> = app.get("/api/customers").await.json();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_mutations_write_audit_rows() {
    let app = TestApp::new().await;
    let customer = create_customer(&app, "Acme Corp").await;

    let entries: Vec<Value> = app
        .get("/api/audit-logs?action=customer.create")
        .await
        .json();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["actor"], "api");
    assert_eq!(entries[0]["target_id"], customer.id.as_str());
}
