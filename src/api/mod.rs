//! API routes and handlers
//!
//! This module defines all API endpoints and their routing.

use axum::{routing::get, Router};

use crate::AppState;

mod audit_logs;
mod bulk;
mod case_folders;
mod custom_fields;
mod customers;
mod directories;
mod health;
mod templates;

pub use health::*;

/// Create the full API router
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness))
        // Resource endpoints
        .nest(
            "/customers",
            customers::routes().merge(case_folders::customer_routes()),
        )
        .nest("/case-folders", case_folders::routes())
        .nest("/templates", templates::routes())
        .nest("/custom-fields", custom_fields::routes())
        .nest("/audit-logs", audit_logs::routes())
        .nest("/bulk", bulk::routes())
        // Directory helpers live at the API root
        .merge(directories::routes())
}
