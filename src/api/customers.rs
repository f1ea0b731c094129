//! Customer API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    models::{
        CreateCustomerRequest, Customer, CustomerFilter, RenameCustomerRequest,
        UpdateCustomerRequest,
    },
    services::{CustomerService, RenameOutcome},
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/{id}",
            get(get_customer)
                .put(update_customer)
                .delete(delete_customer),
        )
        .route("/{id}/rename", post(rename_customer))
}

#[derive(Debug, Serialize)]
struct RenameResponse {
    renamed: bool,
    customer: Customer,
}

async fn list_customers(
    State(state): State<AppState>,
    Query(filter): Query<CustomerFilter>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let customers = CustomerService::new(&state.db).list(&filter).await?;
    Ok(Json(customers))
}

async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, AppError> {
    let id = parse_customer_id(&id)?;
    let customer = CustomerService::new(&state.db)
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Customer not found"))?;
    Ok(Json(customer))
}

async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let customer = CustomerService::new(&state.db).add(&payload).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> Result<Json<Customer>, AppError> {
    let id = parse_customer_id(&id)?;
    let customer = CustomerService::new(&state.db).update(id, &payload).await?;
    Ok(Json(customer))
}

async fn rename_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<RenameCustomerRequest>,
) -> Result<Json<RenameResponse>, AppError> {
    let id = parse_customer_id(&id)?;
    let outcome = CustomerService::new(&state.db)
        .rename(id, &payload.new_name)
        .await?;

    let response = match outcome {
        RenameOutcome::Renamed(customer) => RenameResponse {
            renamed: true,
            customer,
        },
        RenameOutcome::Unchanged(customer) => RenameResponse {
            renamed: false,
            customer,
        },
    };
    Ok(Json(response))
}

async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<bool>, AppError> {
    let id = parse_customer_id(&id)?;
    CustomerService::new(&state.db).delete(id).await?;
    Ok(Json(true))
}

pub(crate) fn parse_customer_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::bad_request("Invalid customer ID"))
}
