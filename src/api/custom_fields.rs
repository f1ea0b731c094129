//! Custom field API endpoints
//!
//! Definitions are managed at `/custom-fields`; values are set and read per
//! definition.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    db::CustomFieldRepository,
    models::{
        CreateFieldDefinitionRequest, CustomFieldDefinition, CustomFieldValue, EntityKind,
        SetFieldValueRequest,
    },
    utils::{validation::validate_field_name, AppError},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_definitions).post(create_definition))
        .route("/{id}", get(get_definition).delete(delete_definition))
        .route("/{id}/values", post(set_value))
        .route("/values/{entity_id}", get(values_for_entity))
}

#[derive(Debug, Default, Deserialize)]
struct DefinitionFilter {
    entity: Option<EntityKind>,
}

async fn list_definitions(
    State(state): State<AppState>,
    Query(filter): Query<DefinitionFilter>,
) -> Result<Json<Vec<CustomFieldDefinition>>, AppError> {
    let definitions = CustomFieldRepository::new(&state.db)
        .list_definitions(filter.entity)
        .await?;
    Ok(Json(definitions))
}

async fn get_definition(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CustomFieldDefinition>, AppError> {
    let id = parse_definition_id(&id)?;
    let definition = CustomFieldRepository::new(&state.db)
        .get_definition(id)
        .await?
        .ok_or_else(|| AppError::not_found("Custom field definition not found"))?;
    Ok(Json(definition))
}

async fn create_definition(
    State(state): State<AppState>,
    Json(payload): Json<CreateFieldDefinitionRequest>,
) -> Result<(StatusCode, Json<CustomFieldDefinition>), AppError> {
    if !validate_field_name(&payload.name) {
        return Err(AppError::validation(
            "Field name must be a valid identifier",
        ));
    }
    if payload.label.trim().is_empty() {
        return Err(AppError::validation("Field label is required"));
    }

    let definition = CustomFieldRepository::new(&state.db)
        .insert_definition(&payload)
        .await?;
    Ok((StatusCode::CREATED, Json(definition)))
}

async fn delete_definition(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<bool>, AppError> {
    let id = parse_definition_id(&id)?;
    let deleted = CustomFieldRepository::new(&state.db)
        .delete_definition(id)
        .await?;
    if !deleted {
        return Err(AppError::not_found("Custom field definition not found"));
    }
    Ok(Json(true))
}

async fn set_value(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SetFieldValueRequest>,
) -> Result<Json<CustomFieldValue>, AppError> {
    let id = parse_definition_id(&id)?;
    let repo = CustomFieldRepository::new(&state.db);

    repo.get_definition(id)
        .await?
        .ok_or_else(|| AppError::not_found("Custom field definition not found"))?;

    let value = repo
        .upsert_value(id, &payload.entity_id, payload.value.as_deref())
        .await?;
    Ok(Json(value))
}

async fn values_for_entity(
    State(state): State<AppState>,
    Path(entity_id): Path<String>,
) -> Result<Json<Vec<CustomFieldValue>>, AppError> {
    let values = CustomFieldRepository::new(&state.db)
        .values_for_entity(&entity_id)
        .await?;
    Ok(Json(values))
}

fn parse_definition_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::bad_request("Invalid definition ID"))
}
