use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use foodgram_user as user;
use serde::Deserialize;
use serde_json::json;

use crate::auth::{AuthUser, MaybeUser};
use crate::error::ApiError;
use crate::routes::{AppState, Paginated, Pagination};

#[derive(Debug, Deserialize)]
pub struct RecipesLimit {
    pub recipes_limit: Option<i64>,
}

/// POST /api/users - Create an account
#[tracing::instrument(skip(state, input), fields(email = %input.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<user::RegisterInput>,
) -> Result<impl IntoResponse, ApiError> {
    let created = user::register_user(&state.pool, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": created.id,
            "email": created.email,
            "username": created.username,
            "first_name": created.first_name,
            "last_name": created.last_name,
        })),
    ))
}

/// GET /api/users - Paginated account list
pub async fn list(
    MaybeUser(viewer): MaybeUser,
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    let (count, results) =
        user::query_users(&state.pool, viewer, pagination.limit, pagination.offset).await?;

    Ok(Json(Paginated { count, results }))
}

/// GET /api/users/me - The caller's own profile
pub async fn me(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = user::query_user_profile(&state.pool, user_id, Some(user_id)).await?;

    Ok(Json(profile))
}

/// GET /api/users/{id} - Public profile
pub async fn detail(
    MaybeUser(viewer): MaybeUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = user::query_user_profile(&state.pool, id, viewer).await?;

    Ok(Json(profile))
}

/// POST /api/users/set_password - Replace the caller's password
#[tracing::instrument(skip(state, input))]
pub async fn set_password(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<user::ChangePasswordInput>,
) -> Result<impl IntoResponse, ApiError> {
    user::change_password(&state.pool, user_id, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Password updated!" })),
    ))
}

/// GET /api/users/subscriptions - Authors the caller follows, with their
/// recent recipes attached
pub async fn subscriptions(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<RecipesLimit>,
) -> Result<impl IntoResponse, ApiError> {
    let profiles =
        user::query_subscriptions(&state.pool, user_id, query.recipes_limit).await?;

    Ok(Json(profiles))
}

/// POST /api/users/{id}/subscribe - Follow an author
#[tracing::instrument(skip(state))]
pub async fn subscribe(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Path(author_id): Path<i64>,
    Query(query): Query<RecipesLimit>,
) -> Result<impl IntoResponse, ApiError> {
    let profile =
        user::subscribe(&state.pool, user_id, author_id, query.recipes_limit).await?;

    Ok((StatusCode::CREATED, Json(profile)))
}

/// DELETE /api/users/{id}/subscribe - Unfollow an author
#[tracing::instrument(skip(state))]
pub async fn unsubscribe(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Path(author_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    user::unsubscribe(&state.pool, user_id, author_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
