use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use foodgram_recipe::{query_tag_by_id, query_tags};

use crate::error::ApiError;
use crate::routes::AppState;

/// GET /api/tags - Full tag list, unpaginated reference data
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let tags = query_tags(&state.pool).await?;

    Ok(Json(tags))
}

/// GET /api/tags/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let tag = query_tag_by_id(&state.pool, id).await?;

    Ok(Json(tag))
}
