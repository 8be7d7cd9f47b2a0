//! StaffHub API - Employee Directory Platform
//!
//! CRUD resources for employees, departments, and department types over
//! PostgreSQL, with JWT login for employees. Every operation returns a
//! uniform response envelope; writes are staged on a per-request unit of
//! work and committed in one transaction.

mod auth;
mod config;
mod db;
mod error;
mod models;
mod repository;
mod routes;
mod state;
mod unit_of_work;

use crate::config::Settings;
use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting StaffHub - Employee Directory API...");

    // Load configuration
    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");

    // Initialize database pool - REQUIRED (no in-memory fallback)
    let pool = match db::create_pool(&settings.database).await {
        Ok(pool) => {
            info!("✅ Database pool created successfully");
            pool
        }
        Err(e) => {
            error!("❌ FATAL: Failed to initialize database pool: {}", e);
            error!("DATABASE_URL must be set in .env and database must be accessible");
            anyhow::bail!("Cannot start server without database connection");
        }
    };

    // Create tables if they don't exist
    db::ensure_schema(&pool).await?;

    let state = Arc::new(AppState::new(pool, settings.jwt.clone()));

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   ─── Employee ───");
    info!("   GET    /api/Employee/GetEmployee?id=   - Fetch one employee");
    info!("   GET    /api/Employee/GetByName?name=   - Fetch employee by name");
    info!("   GET    /api/Employee/GetTopSalary      - Highest-paid employee");
    info!("   GET    /api/Employee/GetAll            - List all employees");
    info!("   POST   /api/Employee/Create            - Create employee");
    info!("   DELETE /api/Employee/Delete            - Delete employee");
    info!("   GET    /api/Employee/Edit              - Edit employee");
    info!("   POST   /api/Employee/Login             - Login, returns JWT");
    info!("");
    info!("   ─── Department ───");
    info!("   GET    /api/Department/GetDepartment?id= - Fetch one department");
    info!("   GET    /api/Department/GetAll            - List all departments");
    info!("   POST   /api/Department/Create            - Create department");
    info!("   DELETE /api/Department/Delete            - Delete department");
    info!("   GET    /api/Department/Edit              - Edit department");
    info!("");
    info!("   ─── DepartmentType ───");
    info!("   GET    /api/DepartmentType/GetDepartmentType?id= - Fetch one type");
    info!("   GET    /api/DepartmentType/GetAll                - List all types");
    info!("   POST   /api/DepartmentType/Create                - Create type");
    info!("   DELETE /api/DepartmentType/Delete                - Delete type");
    info!("   GET    /api/DepartmentType/Edit                  - Edit type");
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,staffhub_api=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
