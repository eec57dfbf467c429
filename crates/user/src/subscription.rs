use serde::Serialize;
use sqlx::SqlitePool;
use sqlx::prelude::FromRow;

use crate::account::query_user_by_id;
use crate::error::{UserError, UserResult};

/// Compact recipe shape embedded in subscription profiles
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeSummary {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i64,
}

/// Author profile enriched with their most recent recipes
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionProfile {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub recipes: Vec<RecipeSummary>,
    pub recipes_count: i64,
}

/// Create a (follower, author) edge
///
/// Self-follow and duplicate edges are rejected here with descriptive errors;
/// the schema carries matching CHECK/UNIQUE constraints as the backstop for
/// concurrent requests.
pub async fn subscribe(
    pool: &SqlitePool,
    follower_id: i64,
    author_id: i64,
    recipes_limit: Option<i64>,
) -> UserResult<SubscriptionProfile> {
    if follower_id == author_id {
        return Err(UserError::SelfSubscription);
    }

    query_user_by_id(pool, author_id)
        .await?
        .ok_or(UserError::NotFound)?;

    // INSERT OR IGNORE + rows_affected keeps concurrent duplicate requests a
    // client error instead of a constraint violation
    let inserted =
        sqlx::query("INSERT OR IGNORE INTO subscriptions (user_id, author_id) VALUES (?1, ?2)")
            .bind(follower_id)
            .bind(author_id)
            .execute(pool)
            .await?
            .rows_affected();

    if inserted == 0 {
        return Err(UserError::AlreadySubscribed);
    }

    tracing::info!(follower = follower_id, author = author_id, "subscribed");

    query_subscription_profile(pool, follower_id, author_id, recipes_limit).await
}

/// Remove a (follower, author) edge; missing edge is a client error
pub async fn unsubscribe(pool: &SqlitePool, follower_id: i64, author_id: i64) -> UserResult<()> {
    query_user_by_id(pool, author_id)
        .await?
        .ok_or(UserError::NotFound)?;

    let deleted = sqlx::query("DELETE FROM subscriptions WHERE user_id = ?1 AND author_id = ?2")
        .bind(follower_id)
        .bind(author_id)
        .execute(pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(UserError::NotSubscribed);
    }

    Ok(())
}

/// Authors the user follows, each with their recent recipes attached
pub async fn query_subscriptions(
    pool: &SqlitePool,
    follower_id: i64,
    recipes_limit: Option<i64>,
) -> UserResult<Vec<SubscriptionProfile>> {
    let author_ids = sqlx::query_scalar::<_, i64>(
        "SELECT author_id FROM subscriptions WHERE user_id = ?1 ORDER BY id DESC",
    )
    .bind(follower_id)
    .fetch_all(pool)
    .await?;

    let mut profiles = Vec::with_capacity(author_ids.len());
    for author_id in author_ids {
        profiles.push(query_subscription_profile(pool, follower_id, author_id, recipes_limit).await?);
    }

    Ok(profiles)
}

async fn query_subscription_profile(
    pool: &SqlitePool,
    follower_id: i64,
    author_id: i64,
    recipes_limit: Option<i64>,
) -> UserResult<SubscriptionProfile> {
    let author = query_user_by_id(pool, author_id)
        .await?
        .ok_or(UserError::NotFound)?;

    let is_subscribed = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM subscriptions WHERE user_id = ?1 AND author_id = ?2",
    )
    .bind(follower_id)
    .bind(author_id)
    .fetch_one(pool)
    .await?
        > 0;

    // Most-recent-first preview; no limit means the full set
    let recipes = match recipes_limit {
        Some(limit) => {
            sqlx::query_as::<_, RecipeSummary>(
                "SELECT id, name, image, cooking_time FROM recipes
                 WHERE author_id = ?1 ORDER BY pub_date DESC, id DESC LIMIT ?2",
            )
            .bind(author_id)
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, RecipeSummary>(
                "SELECT id, name, image, cooking_time FROM recipes
                 WHERE author_id = ?1 ORDER BY pub_date DESC, id DESC",
            )
            .bind(author_id)
            .fetch_all(pool)
            .await?
        }
    };

    let recipes_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM recipes WHERE author_id = ?1")
            .bind(author_id)
            .fetch_one(pool)
            .await?;

    Ok(SubscriptionProfile {
        email: author.email,
        id: author.id,
        username: author.username,
        first_name: author.first_name,
        last_name: author.last_name,
        is_subscribed,
        recipes,
        recipes_count,
    })
}
