use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use foodgram_user::{authenticate_user, generate_jwt};
use serde::Deserialize;
use serde_json::json;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/token/login - Issue a bearer token for valid credentials
#[tracing::instrument(skip(state, input), fields(email = %input.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<impl IntoResponse, ApiError> {
    let user = authenticate_user(&state.pool, &input.email, &input.password).await?;

    let token = generate_jwt(
        user.id,
        user.email,
        &state.config.jwt.secret,
        state.config.jwt.expiration_days,
    )?;

    Ok((StatusCode::CREATED, Json(json!({ "auth_token": token }))))
}

/// POST /api/auth/token/logout - Tokens are stateless; the endpoint exists so
/// clients have a uniform logout call and a place to validate their token
pub async fn logout(_user: AuthUser) -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
