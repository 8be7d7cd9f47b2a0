//! Database bootstrap
//!
//! Handles connection pool creation and schema initialization.

use crate::config::DatabaseConfig;
use crate::error::AppError;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;
use tracing::info;

/// Create a connection pool, over TLS when the configuration demands it.
pub async fn create_pool(config: &DatabaseConfig) -> Result<Pool, AppError> {
    let mut cfg = Config::new();
    cfg.host = Some(config.host.clone());
    cfg.port = Some(config.port);
    cfg.user = Some(config.user.clone());
    cfg.password = Some(config.password.clone());
    cfg.dbname = Some(config.database.clone());
    cfg.pool = Some(PoolConfig::new(config.max_pool_size));
    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });

    let pool = if config.tls {
        let certs = rustls_native_certs::load_native_certs();
        let mut root_store = rustls::RootCertStore::empty();
        for cert in certs.certs {
            root_store.add(cert).ok();
        }

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);

        cfg.create_pool(Some(Runtime::Tokio1), tls)
            .map_err(|e| AppError::Config(format!("Failed to create TLS pool: {}", e)))?
    } else {
        cfg.create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| AppError::Config(format!("Failed to create pool: {}", e)))?
    };

    // Verify the connection before serving traffic
    let client = pool.get().await?;
    client.query_one("SELECT 1", &[]).await?;
    drop(client);

    info!("Database connection successful (TLS: {})", config.tls);
    Ok(pool)
}

/// Create the entity tables if they don't exist.
///
/// Referential integrity is enforced here: employees reference departments,
/// departments reference department types.
pub async fn ensure_schema(pool: &Pool) -> Result<(), AppError> {
    let client = pool.get().await?;

    client
        .execute(
            "CREATE TABLE IF NOT EXISTS department_types (
                id SERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL
            )",
            &[],
        )
        .await?;

    client
        .execute(
            "CREATE TABLE IF NOT EXISTS departments (
                id SERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                department_type_id INTEGER NOT NULL REFERENCES department_types(id)
            )",
            &[],
        )
        .await?;

    client
        .execute(
            "CREATE TABLE IF NOT EXISTS employees (
                id SERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                salary DOUBLE PRECISION NOT NULL,
                department_id INTEGER NOT NULL REFERENCES departments(id),
                password_hash VARCHAR(255) NOT NULL
            )",
            &[],
        )
        .await?;

    // Indexes for the FK lookups
    let _ = client
        .execute(
            "CREATE INDEX IF NOT EXISTS idx_departments_department_type_id \
             ON departments(department_type_id)",
            &[],
        )
        .await;
    let _ = client
        .execute(
            "CREATE INDEX IF NOT EXISTS idx_employees_department_id \
             ON employees(department_id)",
            &[],
        )
        .await;

    info!("Database tables initialized");
    Ok(())
}
