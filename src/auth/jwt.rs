//! JWT token management
//!
//! Handles creation and validation of the access tokens issued at login.
//! Issuer, audience, signing key, and lifetime come from configuration.

use crate::config::JwtConfig;
use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (employee id)
    pub sub: i32,
    /// Employee name
    pub name: String,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Access token response returned from a successful login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Create a signed access token for an employee
pub fn create_token(
    employee_id: i32,
    name: &str,
    config: &JwtConfig,
) -> Result<TokenResponse, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: employee_id,
        name: name.to_string(),
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
        exp: (now + Duration::minutes(config.ttl_minutes)).timestamp(),
        iat: now.timestamp(),
    };

    let access_token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to create access token: {}", e)))?;

    Ok(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: config.ttl_minutes * 60,
    })
}

/// Decode and validate a token's signature, issuer, audience, and lifetime
pub fn decode_token(token: &str, config: &JwtConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);
    validation.set_audience(&[&config.audience]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("Token expired".to_string())
        }
        jsonwebtoken::errors::ErrorKind::InvalidToken => {
            AppError::Unauthorized("Invalid token".to_string())
        }
        _ => AppError::Unauthorized(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> JwtConfig {
        JwtConfig {
            issuer: "staffhub-test".to_string(),
            audience: "staffhub-test-clients".to_string(),
            secret: "test-secret".to_string(),
            ttl_minutes: 30,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let cfg = config();
        let token = create_token(42, "Ada", &cfg).unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 30 * 60);

        let claims = decode_token(&token.access_token, &cfg).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.name, "Ada");
        assert_eq!(claims.iss, "staffhub-test");
        assert_eq!(claims.aud, "staffhub-test-clients");
        // Expiry is strictly in the future
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let cfg = config();
        let token = create_token(42, "Ada", &cfg).unwrap();

        let mut other = config();
        other.secret = "different-secret".to_string();
        assert!(matches!(
            decode_token(&token.access_token, &other),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_wrong_audience_is_rejected() {
        let cfg = config();
        let token = create_token(42, "Ada", &cfg).unwrap();

        let mut other = config();
        other.audience = "someone-else".to_string();
        assert!(decode_token(&token.access_token, &other).is_err());
    }
}
