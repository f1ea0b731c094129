//! Directory helper endpoints
//!
//! Used by the browser frontend to check and prepare customer directories
//! before creating records.

use std::path::Path as FsPath;

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    api::customers::parse_customer_id, services::CustomerService, utils::fs::open_directory,
    utils::AppError, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/validate-directory", post(validate_directory))
        .route("/create-directory", post(create_directory))
        .route("/open-directory/{id}", post(open_customer_directory))
}

#[derive(Debug, Deserialize)]
struct ValidateDirectoryRequest {
    path: String,
}

#[derive(Debug, Deserialize)]
struct CreateDirectoryRequest {
    parent_dir: String,
    #[serde(default = "default_suggested_name")]
    suggested_name: String,
}

fn default_suggested_name() -> String {
    "new_customer".to_string()
}

#[derive(Debug, Serialize)]
struct CreateDirectoryResponse {
    success: bool,
    directory: String,
}

async fn validate_directory(Json(payload): Json<ValidateDirectoryRequest>) -> Json<Value> {
    if payload.path.is_empty() {
        return Json(json!({ "valid": false, "message": "No path provided" }));
    }

    let valid = FsPath::new(&payload.path).is_dir();
    let message = if valid {
        "Directory exists"
    } else {
        "Directory does not exist"
    };
    Json(json!({ "valid": valid, "message": message }))
}

async fn create_directory(
    State(state): State<AppState>,
    Json(payload): Json<CreateDirectoryRequest>,
) -> Result<Json<CreateDirectoryResponse>, AppError> {
    let directory = CustomerService::new(&state.db)
        .create_directory(&payload.parent_dir, &payload.suggested_name)
        .await?;
    Ok(Json(CreateDirectoryResponse {
        success: true,
        directory,
    }))
}

async fn open_customer_directory(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<bool>, AppError> {
    let id = parse_customer_id(&id)?;
    let customer = CustomerService::new(&state.db)
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Customer not found"))?;

    open_directory(FsPath::new(&customer.directory))?;
    Ok(Json(true))
}
