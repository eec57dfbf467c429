use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use foodgram_recipe::{query_ingredient_by_id, query_ingredients};
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct IngredientQuery {
    pub name: Option<String>,
}

/// GET /api/ingredients - Catalog list, optionally filtered by name prefix
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<IngredientQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let ingredients = query_ingredients(&state.pool, query.name.as_deref()).await?;

    Ok(Json(ingredients))
}

/// GET /api/ingredients/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let ingredient = query_ingredient_by_id(&state.pool, id).await?;

    Ok(Json(ingredient))
}
