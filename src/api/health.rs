//! Health check endpoints

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{utils::AppError, AppState};

/// Basic liveness check
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness check that exercises the database
pub async fn readiness(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    sqlx::query("SELECT 1").fetch_one(&state.db).await?;
    Ok(Json(json!({ "status": "ready" })))
}
