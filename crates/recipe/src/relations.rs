use serde::Serialize;
use sqlx::SqlitePool;
use sqlx::prelude::FromRow;

use crate::error::{RecipeError, RecipeResult};

/// Compact recipe echo returned by the favorite/cart add endpoints
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeSummary {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i64,
}

/// Add a recipe to the user's favorites; a duplicate add is a client error.
/// The UNIQUE constraint on (user_id, recipe_id) backstops concurrent adds.
pub async fn add_favorite(
    pool: &SqlitePool,
    user_id: i64,
    recipe_id: i64,
) -> RecipeResult<RecipeSummary> {
    let summary = query_summary(pool, recipe_id).await?;

    let inserted = sqlx::query(
        "INSERT OR IGNORE INTO favorites (user_id, recipe_id) VALUES (?1, ?2)",
    )
    .bind(user_id)
    .bind(recipe_id)
    .execute(pool)
    .await?
    .rows_affected();

    if inserted == 0 {
        return Err(RecipeError::AlreadyFavorited);
    }

    Ok(summary)
}

pub async fn remove_favorite(pool: &SqlitePool, user_id: i64, recipe_id: i64) -> RecipeResult<()> {
    query_summary(pool, recipe_id).await?;

    let deleted = sqlx::query("DELETE FROM favorites WHERE user_id = ?1 AND recipe_id = ?2")
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(RecipeError::NotFavorited);
    }

    Ok(())
}

/// Add a recipe to the user's shopping cart; duplicate adds are rejected the
/// same way as for favorites.
pub async fn add_to_cart(
    pool: &SqlitePool,
    user_id: i64,
    recipe_id: i64,
) -> RecipeResult<RecipeSummary> {
    let summary = query_summary(pool, recipe_id).await?;

    let inserted = sqlx::query(
        "INSERT OR IGNORE INTO shopping_cart (user_id, recipe_id) VALUES (?1, ?2)",
    )
    .bind(user_id)
    .bind(recipe_id)
    .execute(pool)
    .await?
    .rows_affected();

    if inserted == 0 {
        return Err(RecipeError::AlreadyInCart);
    }

    Ok(summary)
}

pub async fn remove_from_cart(pool: &SqlitePool, user_id: i64, recipe_id: i64) -> RecipeResult<()> {
    query_summary(pool, recipe_id).await?;

    let deleted = sqlx::query("DELETE FROM shopping_cart WHERE user_id = ?1 AND recipe_id = ?2")
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(RecipeError::NotInCart);
    }

    Ok(())
}

/// The recipe must resolve before any relation is touched
async fn query_summary(pool: &SqlitePool, recipe_id: i64) -> RecipeResult<RecipeSummary> {
    sqlx::query_as::<_, RecipeSummary>(
        "SELECT id, name, image, cooking_time FROM recipes WHERE id = ?1",
    )
    .bind(recipe_id)
    .fetch_optional(pool)
    .await?
    .ok_or(RecipeError::NotFound)
}
