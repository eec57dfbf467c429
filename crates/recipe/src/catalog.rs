use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use sqlx::prelude::FromRow;

use crate::error::{RecipeError, RecipeResult};

/// Read-mostly reference data: a tag with its display color and slug
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub slug: String,
}

/// Read-mostly reference data: an ingredient with its measurement unit
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

/// Shape of one entry in the ingredient catalog import file
#[derive(Debug, Deserialize)]
pub struct IngredientSeed {
    pub name: String,
    pub measurement_unit: String,
}

pub async fn query_tags(pool: &SqlitePool) -> RecipeResult<Vec<Tag>> {
    let tags = sqlx::query_as::<_, Tag>("SELECT id, name, color, slug FROM tags ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(tags)
}

pub async fn query_tag_by_id(pool: &SqlitePool, id: i64) -> RecipeResult<Tag> {
    sqlx::query_as::<_, Tag>("SELECT id, name, color, slug FROM tags WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(RecipeError::NotFound)
}

/// List ingredients, optionally narrowed by a case-insensitive name prefix
pub async fn query_ingredients(
    pool: &SqlitePool,
    name_prefix: Option<&str>,
) -> RecipeResult<Vec<Ingredient>> {
    let ingredients = match name_prefix {
        Some(prefix) => {
            // Escape LIKE wildcards so the filter stays a plain prefix match
            let pattern = format!(
                "{}%",
                prefix.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
            );
            sqlx::query_as::<_, Ingredient>(
                "SELECT id, name, measurement_unit FROM ingredients
                 WHERE name LIKE ?1 ESCAPE '\\' COLLATE NOCASE ORDER BY name",
            )
            .bind(pattern)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Ingredient>(
                "SELECT id, name, measurement_unit FROM ingredients ORDER BY name",
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(ingredients)
}

pub async fn query_ingredient_by_id(pool: &SqlitePool, id: i64) -> RecipeResult<Ingredient> {
    sqlx::query_as::<_, Ingredient>(
        "SELECT id, name, measurement_unit FROM ingredients WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(RecipeError::NotFound)
}

/// One-time bulk import of the ingredient catalog
///
/// Entries already present (same name and unit) are skipped so the import can
/// be re-run safely.
pub async fn load_ingredients(pool: &SqlitePool, seeds: &[IngredientSeed]) -> RecipeResult<u64> {
    if seeds.is_empty() {
        return Ok(0);
    }

    let mut inserted = 0;
    let mut tx = pool.begin().await?;

    for chunk in seeds.chunks(500) {
        let mut builder = sqlx::QueryBuilder::new(
            "INSERT INTO ingredients (name, measurement_unit) ",
        );
        builder.push_values(chunk, |mut row, seed| {
            row.push_bind(&seed.name).push_bind(&seed.measurement_unit);
        });
        builder.push(" ON CONFLICT (name, measurement_unit) DO NOTHING");

        inserted += builder.build().execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;

    tracing::info!(count = inserted, "ingredient catalog loaded");

    Ok(inserted)
}

/// Seed the fixed three-entry tag list
pub async fn seed_tags(pool: &SqlitePool) -> RecipeResult<()> {
    let tags = [
        ("Breakfast", "#E26C2D", "breakfast"),
        ("Lunch", "#49B64E", "lunch"),
        ("Dinner", "#8775D2", "dinner"),
    ];

    for (name, color, slug) in tags {
        sqlx::query(
            "INSERT INTO tags (name, color, slug) VALUES (?1, ?2, ?3)
             ON CONFLICT (slug) DO NOTHING",
        )
        .bind(name)
        .bind(color)
        .bind(slug)
        .execute(pool)
        .await?;
    }

    Ok(())
}
