//! Case folder API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::{
    api::customers::parse_customer_id,
    models::{CaseFolder, CreateCaseFolderRequest, MoveCaseFolderRequest, OpenCaseFolderRequest},
    services::CaseFolderService,
    utils::AppError,
    AppState,
};

/// Routes nested under `/customers`
pub fn customer_routes() -> Router<AppState> {
    Router::new().route(
        "/{id}/case-folders",
        get(list_case_folders).post(create_case_folder),
    )
}

/// Routes nested under `/case-folders`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/move", post(move_case_folder))
        .route("/open", post(open_case_folder))
}

async fn list_case_folders(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CaseFolder>>, AppError> {
    let customer_id = parse_customer_id(&id)?;
    let folders = CaseFolderService::new(&state.db).list(customer_id).await?;
    Ok(Json(folders))
}

async fn create_case_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CreateCaseFolderRequest>,
) -> Result<(StatusCode, Json<CaseFolder>), AppError> {
    let customer_id = parse_customer_id(&id)?;
    let folder = CaseFolderService::new(&state.db)
        .create(customer_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

async fn move_case_folder(
    State(state): State<AppState>,
    Json(payload): Json<MoveCaseFolderRequest>,
) -> Result<Json<CaseFolder>, AppError> {
    let folder = CaseFolderService::new(&state.db)
        .move_folder(&payload)
        .await?;
    Ok(Json(folder))
}

async fn open_case_folder(
    State(state): State<AppState>,
    Json(payload): Json<OpenCaseFolderRequest>,
) -> Result<Json<bool>, AppError> {
    CaseFolderService::new(&state.db)
        .open(payload.customer_id, &payload.folder_name)
        .await?;
    Ok(Json(true))
}
