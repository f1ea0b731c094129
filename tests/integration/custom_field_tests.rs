//! Custom field integration tests

use serde_json::{json, Value};

use crate::common::fixtures::create_customer;
use crate::common::test_app::TestApp;

async fn create_definition(app: &TestApp, name: &str, entity: &str) -> Value {
    let response = app
        .post_json(
            "/api/custom-fields",
            json!({
                "name": name,
                "label": name.replace('_', " "),
                "field_type": "TEXT",
                "entity": entity,
            }),
        )
        .await;
    response.assert_created();
    response.json()
}

#[tokio::test]
async fn test_create_definition_and_list_by_entity() {
    let app = TestApp::new().await;
    create_definition(&app, "billing_code", "CUSTOMER").await;
    create_definition(&app, "court_reference", "CASE").await;

    let customer_fields: Vec<Value> = app
        .get("/api/custom-fields?entity=CUSTOMER")
        .await
        .json();
    assert_eq!(customer_fields.len(), 1);
    assert_eq!(customer_fields[0]["name"], "billing_code");

    let all: Vec<Value> = app.get("/api/custom-fields").await.json();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_create_definition_rejects_invalid_name() {
    let app = TestApp::new().await;

    app.post_json(
        "/api/custom-fields",
        json!({
            "name": "not a valid name",
            "label": "Whatever",
            "field_type": "TEXT",
            "entity": "CUSTOMER",
        }),
    )
    .await
    .assert_validation_error();
}

#[tokio::test]
async fn test_create_definition_duplicate_name_conflicts() {
    let app = TestApp::new().await;
    create_definition(&app, "billing_code", "CUSTOMER").await;

    app.post_json(
        "/api/custom-fields",
        json!({
            "name": "billing_code",
            "label": "Billing code",
            "field_type": "NUMBER",
            "entity": "CUSTOMER",
        }),
    )
    .await
    .assert_conflict();
}

#[tokio::test]
async fn test_set_value_upserts_on_definition_entity_pair() {
    let app = TestApp::new().await;
    let customer = create_customer(&app, "Acme Corp").await;
    let definition = create_definition(&app, "billing_code", "CUSTOMER").await;
    let definition_id = definition["id"].as_str().unwrap();

    let response = app
        .post_json(
            &format!("/api/custom-fields/{}/values", definition_id),
            json!({ "entity_id": customer.id, "value": "BC-1" }),
        )
        .await;
    response.assert_ok();

    // Second write for the same pair overwrites instead of duplicating
    app.post_json(
        &format!("/api/custom-fields/{}/values", definition_id),
        json!({ "entity_id": customer.id, "value": "BC-2" }),
    )
    .await
    .assert_ok();

    let values: Vec<Value> = app
        .get(&format!("/api/custom-fields/values/{}", customer.id))
        .await
        .json();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0]["value"], "BC-2");
}

#[tokio::test]
async fn test_set_value_unknown_definition_not_found() {
    let app = TestApp::new().await;

    app.post_json(
        "/api/custom-fields/00000000-0000-0000-0000-000000000001/values",
        json!({ "entity_id": "whatever", "value": "x" }),
    )
    .await
    .assert_not_found();
}

#[tokio::test]
async fn test_delete_definition_cascades_values() {
    let app = TestApp::new().await;
    let customer = create_customer(&app, "Acme Corp").await;
    let definition = create_definition(&app, "billing_code", "CUSTOMER").await;
    let definition_id = definition["id"].as_str().unwrap();

    app.post_json(
        &format!("/api/custom-fields/{}/values", definition_id),
        json!({ "entity_id": customer.id, "value": "BC-1" }),
    )
    .await
    .assert_ok();

    app.delete(&format!("/api/custom-fields/{}", definition_id))
        .await
        .assert_ok();

    let values: Vec<Value> = app
        .get(&format!("/api/custom-fields/values/{}", customer.id))
        .await
        .json();
    assert!(values.is_empty());
}
