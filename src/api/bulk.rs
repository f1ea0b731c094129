//! Bulk operation API endpoints

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use crate::{
    models::{
        BatchDeleteRequest, BatchOutcome, BatchUpdateRequest, ExportFormat, ExportRequest,
        ImportDirectoryRequest, RestoreOutcome, RestoreRequest,
    },
    services::BulkService,
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/export", post(export_customers))
        .route("/update", post(batch_update))
        .route("/delete", post(batch_delete))
        .route("/import-directory", post(import_from_directory))
        .route("/restore", post(restore_from_json))
}

async fn export_customers(
    State(state): State<AppState>,
    Json(payload): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let service = BulkService::new(&state.db);
    let response = match payload.format {
        ExportFormat::Csv => {
            let csv = service.export_csv(&payload.ids).await?;
            ([(header::CONTENT_TYPE, "text/csv")], csv).into_response()
        }
        ExportFormat::Json => {
            let customers = service.export_json(&payload.ids).await?;
            Json(customers).into_response()
        }
    };
    Ok(response)
}

async fn batch_update(
    State(state): State<AppState>,
    Json(payload): Json<BatchUpdateRequest>,
) -> Result<Json<BatchOutcome>, AppError> {
    let outcome = BulkService::new(&state.db)
        .batch_update(&payload.ids, &payload.fields)
        .await?;
    Ok(Json(outcome))
}

async fn batch_delete(
    State(state): State<AppState>,
    Json(payload): Json<BatchDeleteRequest>,
) -> Result<Json<BatchOutcome>, AppError> {
    let outcome = BulkService::new(&state.db)
        .batch_delete(&payload.ids)
        .await?;
    Ok(Json(outcome))
}

async fn import_from_directory(
    State(state): State<AppState>,
    Json(payload): Json<ImportDirectoryRequest>,
) -> Result<Json<BatchOutcome>, AppError> {
    let outcome = BulkService::new(&state.db)
        .import_from_directory(&payload)
        .await?;
    Ok(Json(outcome))
}

async fn restore_from_json(
    State(state): State<AppState>,
    Json(payload): Json<RestoreRequest>,
) -> Result<Json<RestoreOutcome>, AppError> {
    let outcome = BulkService::new(&state.db)
        .restore_from_json(&payload.path)
        .await?;
    Ok(Json(outcome))
}
