//! Login service
//!
//! Validates credentials against stored employee records and issues tokens.

use tokio_postgres::GenericClient;

use crate::auth::jwt::{create_token, TokenResponse};
use crate::auth::password::verify_password;
use crate::config::JwtConfig;
use crate::error::AppError;
use crate::models::{Employee, LoginRequest};
use crate::repository::Repository;

/// Validate the supplied credentials and issue a signed access token.
///
/// An unknown name and a wrong password fail identically so the response
/// never reveals which employees exist.
pub async fn login(
    client: &impl GenericClient,
    employees: &Repository<Employee>,
    credentials: &LoginRequest,
    config: &JwtConfig,
) -> Result<TokenResponse, AppError> {
    let employee = employees
        .get_by_name(client, &credentials.name, &[])
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => invalid_credentials(),
            other => other,
        })?;

    if !verify_password(&credentials.password, &employee.password_hash)? {
        return Err(invalid_credentials());
    }

    create_token(employee.id, &employee.name, config)
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid name or password".to_string())
}
