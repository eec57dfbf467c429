use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{UserError, UserResult};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub exp: usize,
    pub iat: usize,
}

/// Generate a bearer token for a user
/// Uses HS256 with the secret from config
pub fn generate_jwt(
    user_id: i64,
    email: String,
    secret: &str,
    expiration_days: i64,
) -> UserResult<String> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| UserError::TokenError(e.to_string()))?
        .as_secs() as usize;

    let claims = Claims {
        sub: user_id,
        email,
        exp: now + (expiration_days as usize) * 24 * 60 * 60,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| UserError::TokenError(e.to_string()))
}

/// Validate and decode a bearer token
pub fn validate_jwt(token: &str, secret: &str) -> UserResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| UserError::TokenError(e.to_string()))?;

    Ok(token_data.claims)
}
