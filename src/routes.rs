//! Route definitions and router setup
//!
//! Configures all API routes and middleware.

mod department;
mod department_type;
mod employee;

use crate::config::Settings;
use crate::state::SharedState;
use axum::{
    http::{header, Method},
    routing::{delete, get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::Level;

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState, settings: &Settings) -> Router {
    // Build CORS layer
    let cors = build_cors_layer(settings);

    // Build tracing/logging layer
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build middleware stack
    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .layer(cors)
        .propagate_x_request_id();

    // Build the router
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Employee resource
        .route("/api/Employee/GetEmployee", get(employee::get_employee))
        .route("/api/Employee/GetByName", get(employee::get_by_name))
        .route("/api/Employee/GetTopSalary", get(employee::get_top_salary))
        .route("/api/Employee/GetAll", get(employee::get_all))
        .route("/api/Employee/Create", post(employee::create))
        .route("/api/Employee/Delete", delete(employee::delete))
        .route("/api/Employee/Edit", get(employee::edit))
        .route("/api/Employee/Login", post(employee::login))
        // Department resource
        .route("/api/Department/GetDepartment", get(department::get_department))
        .route("/api/Department/GetAll", get(department::get_all))
        .route("/api/Department/Create", post(department::create))
        .route("/api/Department/Delete", delete(department::delete))
        .route("/api/Department/Edit", get(department::edit))
        // DepartmentType resource
        .route(
            "/api/DepartmentType/GetDepartmentType",
            get(department_type::get_department_type),
        )
        .route("/api/DepartmentType/GetAll", get(department_type::get_all))
        .route("/api/DepartmentType/Create", post(department_type::create))
        .route("/api/DepartmentType/Delete", delete(department_type::delete))
        .route("/api/DepartmentType/Edit", get(department_type::edit))
        // Apply middleware and state
        .layer(middleware)
        .with_state(state)
}

/// Build CORS layer from settings
fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<_> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .max_age(Duration::from_secs(3600))
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .max_age(Duration::from_secs(3600))
    }
}

/// Health check endpoint
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "success": true,
        "message": "Server is running fine.",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
