//! Shared fixtures for integration tests

use serde_json::{json, Value};
use tempfile::TempDir;

use super::test_app::TestApp;

/// A customer created through the API, together with its on-disk directory.
/// The TempDir handle keeps the directory alive for the test's duration.
pub struct CustomerFixture {
    pub id: String,
    pub name: String,
    pub directory: String,
    pub _dir: TempDir,
}

/// Create a customer with a real directory via the API.
pub async fn create_customer(app: &TestApp, name: &str) -> CustomerFixture {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let directory = dir.path().to_string_lossy().to_string();

    let response = app
        .post_json(
            "/api/customers",
            json!({
                "name": name,
                "email": format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                "directory": directory,
            }),
        )
        .await;
    response.assert_created();

    let body: Value = response.json();
    CustomerFixture {
        id: body["id"].as_str().expect("customer id").to_string(),
        name: name.to_string(),
        directory,
        _dir: dir,
    }
}

/// Create a case folder for a customer via the API and return its response
/// body.
pub async fn create_case_folder(
    app: &TestApp,
    customer_id: &str,
    case_number: &str,
    description: &str,
) -> Value {
    let response = app
        .post_json(
            &format!("/api/customers/{}/case-folders", customer_id),
            json!({
                "case_number": case_number,
                "description": description,
            }),
        )
        .await;
    response.assert_created();
    response.json()
}
