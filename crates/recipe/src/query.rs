use foodgram_user::{UserProfile, query_user_profile};
use serde::Serialize;
use sqlx::SqlitePool;
use sqlx::prelude::FromRow;

use crate::catalog::Tag;
use crate::error::{RecipeError, RecipeResult};

/// Ingredient line in the full recipe representation
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeIngredientDetail {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Full recipe representation returned by the read endpoints
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub tags: Vec<Tag>,
    pub author: UserProfile,
    pub ingredients: Vec<RecipeIngredientDetail>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
}

/// Query-parameter filters on the recipe list
#[derive(Debug, Default)]
pub struct RecipeFilter {
    pub author: Option<i64>,
    pub tags: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

#[derive(Debug, FromRow)]
struct RecipeRow {
    id: i64,
    author_id: i64,
    name: String,
    image: String,
    text: String,
    cooking_time: i64,
}

/// Assemble the full representation for one recipe as seen by `viewer`
pub async fn query_recipe_by_id(
    pool: &SqlitePool,
    recipe_id: i64,
    viewer: Option<i64>,
) -> RecipeResult<RecipeDetail> {
    let row = sqlx::query_as::<_, RecipeRow>(
        "SELECT id, author_id, name, image, text, cooking_time FROM recipes WHERE id = ?1",
    )
    .bind(recipe_id)
    .fetch_optional(pool)
    .await?
    .ok_or(RecipeError::NotFound)?;

    build_detail(pool, row, viewer).await
}

/// Recipe list, newest first, with the original query-param filters.
/// Relation filters (`is_favorited`, `is_in_shopping_cart`) only bite for an
/// authenticated viewer.
pub async fn query_recipes(
    pool: &SqlitePool,
    filter: &RecipeFilter,
    viewer: Option<i64>,
    limit: i64,
    offset: i64,
) -> RecipeResult<(i64, Vec<RecipeDetail>)> {
    // Builders cannot be cloned, so the filtered FROM/WHERE tail is
    // constructed once for the count and once for the page query.
    let count = filtered_query("SELECT COUNT(*)", filter, viewer)
        .build_query_scalar::<i64>()
        .fetch_one(pool)
        .await?;

    let mut builder = filtered_query(
        "SELECT r.id, r.author_id, r.name, r.image, r.text, r.cooking_time",
        filter,
        viewer,
    );
    builder
        .push(" ORDER BY r.pub_date DESC, r.id DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let rows = builder.build_query_as::<RecipeRow>().fetch_all(pool).await?;

    let mut details = Vec::with_capacity(rows.len());
    for row in rows {
        details.push(build_detail(pool, row, viewer).await?);
    }

    Ok((count, details))
}

fn filtered_query<'a>(
    select: &str,
    filter: &'a RecipeFilter,
    viewer: Option<i64>,
) -> sqlx::QueryBuilder<'a, sqlx::Sqlite> {
    let mut builder = sqlx::QueryBuilder::new(select);
    builder.push(" FROM recipes r WHERE 1 = 1");

    if let Some(author) = filter.author {
        builder.push(" AND r.author_id = ").push_bind(author);
    }

    if !filter.tags.is_empty() {
        builder.push(
            " AND r.id IN (SELECT rt.recipe_id FROM recipe_tags rt \
             JOIN tags t ON t.id = rt.tag_id WHERE t.slug IN (",
        );
        let mut separated = builder.separated(", ");
        for slug in &filter.tags {
            separated.push_bind(slug);
        }
        builder.push("))");
    }

    if let Some(viewer_id) = viewer {
        if filter.is_favorited {
            builder
                .push(" AND r.id IN (SELECT recipe_id FROM favorites WHERE user_id = ")
                .push_bind(viewer_id)
                .push(")");
        }
        if filter.is_in_shopping_cart {
            builder
                .push(" AND r.id IN (SELECT recipe_id FROM shopping_cart WHERE user_id = ")
                .push_bind(viewer_id)
                .push(")");
        }
    }

    builder
}

async fn build_detail(
    pool: &SqlitePool,
    row: RecipeRow,
    viewer: Option<i64>,
) -> RecipeResult<RecipeDetail> {
    let tags = sqlx::query_as::<_, Tag>(
        "SELECT t.id, t.name, t.color, t.slug FROM tags t
         JOIN recipe_tags rt ON rt.tag_id = t.id
         WHERE rt.recipe_id = ?1 ORDER BY t.name",
    )
    .bind(row.id)
    .fetch_all(pool)
    .await?;

    let ingredients = sqlx::query_as::<_, RecipeIngredientDetail>(
        "SELECT i.id, i.name, i.measurement_unit, ri.amount FROM recipe_ingredients ri
         JOIN ingredients i ON i.id = ri.ingredient_id
         WHERE ri.recipe_id = ?1 ORDER BY ri.id",
    )
    .bind(row.id)
    .fetch_all(pool)
    .await?;

    let author = query_user_profile(pool, row.author_id, viewer).await?;

    let (is_favorited, is_in_shopping_cart) = match viewer {
        Some(viewer_id) => {
            let favorited = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM favorites WHERE user_id = ?1 AND recipe_id = ?2",
            )
            .bind(viewer_id)
            .bind(row.id)
            .fetch_one(pool)
            .await?
                > 0;
            let in_cart = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM shopping_cart WHERE user_id = ?1 AND recipe_id = ?2",
            )
            .bind(viewer_id)
            .bind(row.id)
            .fetch_one(pool)
            .await?
                > 0;
            (favorited, in_cart)
        }
        None => (false, false),
    };

    Ok(RecipeDetail {
        id: row.id,
        tags,
        author,
        ingredients,
        is_favorited,
        is_in_shopping_cart,
        name: row.name,
        image: row.image,
        text: row.text,
        cooking_time: row.cooking_time,
    })
}
