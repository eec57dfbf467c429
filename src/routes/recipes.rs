use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use axum_extra::extract::Query;
use foodgram_recipe as recipe;
use foodgram_shopping::{SHOPPING_LIST_FILENAME, aggregate_cart, render_shopping_list};
use serde::Deserialize;

use crate::auth::{AuthUser, MaybeUser};
use crate::error::ApiError;
use crate::media::store_image;
use crate::routes::{AppState, Paginated};

/// Query parameters on the recipe list; `tags` may repeat
#[derive(Debug, Default, Deserialize)]
pub struct RecipeListQuery {
    pub author: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    10
}

// The original filter widget accepts both boolean words and 0/1
fn flag(value: Option<&str>) -> bool {
    matches!(value, Some("1") | Some("true") | Some("True"))
}

/// GET /api/recipes - Newest-first recipe list with query-param filters
pub async fn list(
    MaybeUser(viewer): MaybeUser,
    State(state): State<AppState>,
    Query(query): Query<RecipeListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = recipe::RecipeFilter {
        author: query.author,
        tags: query.tags,
        is_favorited: flag(query.is_favorited.as_deref()),
        is_in_shopping_cart: flag(query.is_in_shopping_cart.as_deref()),
    };

    let (count, results) =
        recipe::query_recipes(&state.pool, &filter, viewer, query.limit, query.offset).await?;

    Ok(Json(Paginated { count, results }))
}

/// POST /api/recipes - Create a recipe aggregate
#[tracing::instrument(skip(state, input))]
pub async fn create(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<recipe::RecipeInput>,
) -> Result<impl IntoResponse, ApiError> {
    // Reject bad payloads before the image lands on disk
    recipe::validate_payload(input.cooking_time, &input.ingredients, &input.tags)?;

    let image = match input.image.as_deref() {
        Some(data_uri) if !data_uri.is_empty() => {
            Some(store_image(&state.config.media.root, data_uri)?)
        }
        _ => None,
    };

    let recipe_id =
        recipe::create_recipe(&state.pool, user_id, recipe::RecipeInput { image, ..input })
            .await?;

    let detail = recipe::query_recipe_by_id(&state.pool, recipe_id, Some(user_id)).await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/recipes/{id} - Full representation as seen by the viewer
pub async fn detail(
    MaybeUser(viewer): MaybeUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = recipe::query_recipe_by_id(&state.pool, id, viewer).await?;

    Ok(Json(detail))
}

/// PATCH /api/recipes/{id} - Partial update; absent collections stay as-is
#[tracing::instrument(skip(state, update))]
pub async fn update(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<recipe::RecipeUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let image = match update.image.as_deref() {
        Some(data_uri) if !data_uri.is_empty() => {
            Some(store_image(&state.config.media.root, data_uri)?)
        }
        _ => None,
    };

    recipe::update_recipe(
        &state.pool,
        user_id,
        id,
        recipe::RecipeUpdate { image, ..update },
    )
    .await?;

    let detail = recipe::query_recipe_by_id(&state.pool, id, Some(user_id)).await?;

    Ok(Json(detail))
}

/// DELETE /api/recipes/{id}
#[tracing::instrument(skip(state))]
pub async fn delete(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    recipe::delete_recipe(&state.pool, user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/recipes/{id}/favorite
pub async fn add_favorite(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = recipe::add_favorite(&state.pool, user_id, id).await?;

    Ok((StatusCode::CREATED, Json(summary)))
}

/// DELETE /api/recipes/{id}/favorite
pub async fn remove_favorite(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    recipe::remove_favorite(&state.pool, user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/recipes/{id}/shopping_cart
pub async fn add_to_cart(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = recipe::add_to_cart(&state.pool, user_id, id).await?;

    Ok((StatusCode::CREATED, Json(summary)))
}

/// DELETE /api/recipes/{id}/shopping_cart
pub async fn remove_from_cart(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    recipe::remove_from_cart(&state.pool, user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/recipes/download_shopping_cart - Aggregated ingredient list as a
/// plain-text attachment
#[tracing::instrument(skip(state))]
pub async fn download_shopping_cart(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let items = aggregate_cart(&state.pool, user_id).await?;
    let report = render_shopping_list(&items);

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={SHOPPING_LIST_FILENAME}"),
            ),
        ],
        report,
    ))
}
