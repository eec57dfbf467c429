use serde::Deserialize;
use sqlx::{Sqlite, SqlitePool, Transaction};
use time::OffsetDateTime;

use crate::error::{RecipeError, RecipeResult};

/// One (ingredient, amount) pair in a write payload
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientAmount {
    pub id: i64,
    pub amount: i64,
}

/// Full payload for recipe creation
#[derive(Debug, Deserialize)]
pub struct RecipeInput {
    pub name: String,
    pub text: String,
    pub cooking_time: i64,
    pub image: Option<String>,
    pub tags: Vec<i64>,
    pub ingredients: Vec<IngredientAmount>,
}

/// Partial payload for recipe update; absent collections stay untouched
#[derive(Debug, Default, Deserialize)]
pub struct RecipeUpdate {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
    pub image: Option<String>,
    pub tags: Option<Vec<i64>>,
    pub ingredients: Option<Vec<IngredientAmount>>,
}

/// Payload checks that need no store access, in a fixed order:
/// cooking time, ingredient amounts, empty ingredient list, duplicate
/// ingredients, empty tag list.
pub fn validate_payload(
    cooking_time: i64,
    ingredients: &[IngredientAmount],
    tags: &[i64],
) -> RecipeResult<()> {
    if cooking_time < 1 {
        return Err(RecipeError::ValidationError(
            "Cooking time must be >= 1!".to_string(),
        ));
    }

    validate_ingredients(ingredients)?;

    if tags.is_empty() {
        return Err(RecipeError::ValidationError(
            "Recipe needs at least one tag!".to_string(),
        ));
    }

    Ok(())
}

/// Amount, emptiness and uniqueness checks on the ingredient list
fn validate_ingredients(ingredients: &[IngredientAmount]) -> RecipeResult<()> {
    if ingredients.iter().any(|i| i.amount < 1) {
        return Err(RecipeError::ValidationError(
            "Ingredient amount must be >= 1!".to_string(),
        ));
    }

    if ingredients.is_empty() {
        return Err(RecipeError::ValidationError(
            "Recipe needs at least one ingredient!".to_string(),
        ));
    }

    let mut seen = Vec::with_capacity(ingredients.len());
    for ingredient in ingredients {
        if seen.contains(&ingredient.id) {
            return Err(RecipeError::ValidationError(
                "Ingredient must be unique!".to_string(),
            ));
        }
        seen.push(ingredient.id);
    }

    Ok(())
}

/// Create the recipe aggregate in one transaction: the recipe row, its tag
/// links and a single batched insert of the ingredient rows. Any failure
/// rolls everything back.
pub async fn create_recipe(
    pool: &SqlitePool,
    author_id: i64,
    input: RecipeInput,
) -> RecipeResult<i64> {
    validate_payload(input.cooking_time, &input.ingredients, &input.tags)?;

    let mut tx = pool.begin().await?;

    resolve_ingredients(&mut tx, &input.ingredients).await?;
    resolve_tags(&mut tx, &input.tags).await?;

    let pub_date = OffsetDateTime::now_utc().unix_timestamp();

    let recipe_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO recipes (author_id, name, image, text, cooking_time, pub_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         RETURNING id",
    )
    .bind(author_id)
    .bind(&input.name)
    .bind(input.image.as_deref().unwrap_or(""))
    .bind(&input.text)
    .bind(input.cooking_time)
    .bind(pub_date)
    .fetch_one(&mut *tx)
    .await?;

    link_tags(&mut tx, recipe_id, &input.tags).await?;
    link_ingredients(&mut tx, recipe_id, &input.ingredients).await?;

    tx.commit().await?;

    tracing::info!(recipe_id, author_id, "recipe created");

    Ok(recipe_id)
}

/// Update a recipe; only the author may do so. When the payload carries an
/// ingredient list the existing links are cleared and re-batch-inserted; the
/// tag set is likewise replaced wholesale when present. Scalar fields update
/// independently. All of it is one transaction.
pub async fn update_recipe(
    pool: &SqlitePool,
    user_id: i64,
    recipe_id: i64,
    update: RecipeUpdate,
) -> RecipeResult<()> {
    if let Some(cooking_time) = update.cooking_time {
        if cooking_time < 1 {
            return Err(RecipeError::ValidationError(
                "Cooking time must be >= 1!".to_string(),
            ));
        }
    }

    if let Some(ref ingredients) = update.ingredients {
        validate_ingredients(ingredients)?;
    }

    if let Some(ref tags) = update.tags {
        if tags.is_empty() {
            return Err(RecipeError::ValidationError(
                "Recipe needs at least one tag!".to_string(),
            ));
        }
    }

    let mut tx = pool.begin().await?;

    let author_id = sqlx::query_scalar::<_, i64>("SELECT author_id FROM recipes WHERE id = ?1")
        .bind(recipe_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RecipeError::NotFound)?;

    if author_id != user_id {
        return Err(RecipeError::PermissionDenied);
    }

    if let Some(ref name) = update.name {
        sqlx::query("UPDATE recipes SET name = ?1 WHERE id = ?2")
            .bind(name)
            .bind(recipe_id)
            .execute(&mut *tx)
            .await?;
    }

    if let Some(ref text) = update.text {
        sqlx::query("UPDATE recipes SET text = ?1 WHERE id = ?2")
            .bind(text)
            .bind(recipe_id)
            .execute(&mut *tx)
            .await?;
    }

    if let Some(cooking_time) = update.cooking_time {
        sqlx::query("UPDATE recipes SET cooking_time = ?1 WHERE id = ?2")
            .bind(cooking_time)
            .bind(recipe_id)
            .execute(&mut *tx)
            .await?;
    }

    if let Some(ref image) = update.image {
        sqlx::query("UPDATE recipes SET image = ?1 WHERE id = ?2")
            .bind(image)
            .bind(recipe_id)
            .execute(&mut *tx)
            .await?;
    }

    if let Some(ref ingredients) = update.ingredients {
        resolve_ingredients(&mut tx, ingredients).await?;

        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?1")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await?;

        link_ingredients(&mut tx, recipe_id, ingredients).await?;
    }

    if let Some(ref tags) = update.tags {
        resolve_tags(&mut tx, tags).await?;

        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = ?1")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await?;

        link_tags(&mut tx, recipe_id, tags).await?;
    }

    tx.commit().await?;

    tracing::info!(recipe_id, user_id, "recipe updated");

    Ok(())
}

/// Delete a recipe; cascades remove its ingredient/tag links and any
/// favorite or cart rows pointing at it.
pub async fn delete_recipe(pool: &SqlitePool, user_id: i64, recipe_id: i64) -> RecipeResult<()> {
    let author_id = sqlx::query_scalar::<_, i64>("SELECT author_id FROM recipes WHERE id = ?1")
        .bind(recipe_id)
        .fetch_optional(pool)
        .await?
        .ok_or(RecipeError::NotFound)?;

    if author_id != user_id {
        return Err(RecipeError::PermissionDenied);
    }

    sqlx::query("DELETE FROM recipes WHERE id = ?1")
        .bind(recipe_id)
        .execute(pool)
        .await?;

    tracing::info!(recipe_id, user_id, "recipe deleted");

    Ok(())
}

/// Every referenced ingredient id must resolve; a miss is NotFound, not a
/// validation error.
async fn resolve_ingredients(
    tx: &mut Transaction<'_, Sqlite>,
    ingredients: &[IngredientAmount],
) -> RecipeResult<()> {
    for ingredient in ingredients {
        let exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ingredients WHERE id = ?1")
                .bind(ingredient.id)
                .fetch_one(&mut **tx)
                .await?;
        if exists == 0 {
            return Err(RecipeError::IngredientNotFound(ingredient.id));
        }
    }

    Ok(())
}

async fn resolve_tags(tx: &mut Transaction<'_, Sqlite>, tags: &[i64]) -> RecipeResult<()> {
    for tag_id in tags {
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tags WHERE id = ?1")
            .bind(tag_id)
            .fetch_one(&mut **tx)
            .await?;
        if exists == 0 {
            return Err(RecipeError::ValidationError(format!(
                "Tag {tag_id} does not exist!"
            )));
        }
    }

    Ok(())
}

async fn link_tags(
    tx: &mut Transaction<'_, Sqlite>,
    recipe_id: i64,
    tags: &[i64],
) -> RecipeResult<()> {
    for tag_id in tags {
        sqlx::query("INSERT OR IGNORE INTO recipe_tags (recipe_id, tag_id) VALUES (?1, ?2)")
            .bind(recipe_id)
            .bind(tag_id)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}

/// Single multi-row insert of the ingredient links
async fn link_ingredients(
    tx: &mut Transaction<'_, Sqlite>,
    recipe_id: i64,
    ingredients: &[IngredientAmount],
) -> RecipeResult<()> {
    let mut builder = sqlx::QueryBuilder::new(
        "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) ",
    );
    builder.push_values(ingredients, |mut row, ingredient| {
        row.push_bind(recipe_id)
            .push_bind(ingredient.id)
            .push_bind(ingredient.amount);
    });

    builder.build().execute(&mut **tx).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(id: i64, amount: i64) -> IngredientAmount {
        IngredientAmount { id, amount }
    }

    #[test]
    fn test_rejects_cooking_time_below_one() {
        let err = validate_payload(0, &[pair(1, 2)], &[1]).unwrap_err();
        assert!(matches!(err, RecipeError::ValidationError(ref m) if m.contains("Cooking time")));
    }

    #[test]
    fn test_rejects_amount_below_one() {
        let err = validate_payload(10, &[pair(1, 0)], &[1]).unwrap_err();
        assert!(matches!(err, RecipeError::ValidationError(ref m) if m.contains("amount")));
    }

    #[test]
    fn test_rejects_empty_ingredient_list() {
        let err = validate_payload(10, &[], &[1]).unwrap_err();
        assert!(
            matches!(err, RecipeError::ValidationError(ref m) if m.contains("at least one ingredient"))
        );
    }

    #[test]
    fn test_rejects_duplicate_ingredient() {
        let err = validate_payload(10, &[pair(1, 2), pair(1, 3)], &[1]).unwrap_err();
        assert!(matches!(err, RecipeError::ValidationError(ref m) if m.contains("unique")));
    }

    #[test]
    fn test_rejects_empty_tag_list() {
        let err = validate_payload(10, &[pair(1, 2)], &[]).unwrap_err();
        assert!(
            matches!(err, RecipeError::ValidationError(ref m) if m.contains("at least one tag"))
        );
    }

    #[test]
    fn test_cooking_time_checked_before_amount() {
        // Both invalid; the cooking time message wins
        let err = validate_payload(0, &[pair(1, 0)], &[]).unwrap_err();
        assert!(matches!(err, RecipeError::ValidationError(ref m) if m.contains("Cooking time")));
    }

    #[test]
    fn test_accepts_valid_payload() {
        assert!(validate_payload(1, &[pair(1, 1), pair(2, 5)], &[1, 2]).is_ok());
    }
}
