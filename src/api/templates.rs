//! Folder template API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::{
    db::TemplateRepository,
    models::{CreateTemplateRequest, Template, UpdateTemplateRequest},
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_templates).post(create_template))
        .route(
            "/{id}",
            get(get_template).put(update_template).delete(delete_template),
        )
}

async fn list_templates(
    State(state): State<AppState>,
) -> Result<Json<Vec<Template>>, AppError> {
    let templates = TemplateRepository::new(&state.db).list().await?;
    Ok(Json(templates))
}

async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Template>, AppError> {
    let template = TemplateRepository::new(&state.db)
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Template not found"))?;
    Ok(Json(template))
}

async fn create_template(
    State(state): State<AppState>,
    Json(payload): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<Template>), AppError> {
    if payload.id.trim().is_empty() || payload.name.trim().is_empty() {
        return Err(AppError::validation("Template id and name are required"));
    }

    let template = Template {
        id: payload.id,
        name: payload.name,
        description: payload.description,
        folders: payload.folders,
    };
    let created = TemplateRepository::new(&state.db).insert(&template).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTemplateRequest>,
) -> Result<Json<Template>, AppError> {
    let updated = TemplateRepository::new(&state.db)
        .update(&id, &payload)
        .await?
        .ok_or_else(|| AppError::not_found("Template not found"))?;
    Ok(Json(updated))
}

async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<bool>, AppError> {
    let deleted = TemplateRepository::new(&state.db).delete(&id).await?;
    if !deleted {
        return Err(AppError::not_found("Template not found"));
    }
    Ok(Json(true))
}
