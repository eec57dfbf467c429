use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use sqlx::prelude::FromRow;
use time::OffsetDateTime;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::password::{hash_password, verify_password};

/// Account row as stored
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub created_at: i64,
}

/// Public profile shape returned by the user endpoints
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, max = 150, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordInput {
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
    pub current_password: String,
}

/// Create an account with a hashed password
///
/// Email and username must be unique; both are checked up front so the caller
/// gets a field-scoped message rather than a bare constraint violation.
pub async fn register_user(pool: &SqlitePool, input: RegisterInput) -> UserResult<User> {
    input
        .validate()
        .map_err(|e| UserError::ValidationError(e.to_string()))?;

    let email_taken = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = ?1")
        .bind(&input.email)
        .fetch_one(pool)
        .await?;
    if email_taken > 0 {
        return Err(UserError::ValidationError(
            "Email already registered".to_string(),
        ));
    }

    let username_taken =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = ?1")
            .bind(&input.username)
            .fetch_one(pool)
            .await?;
    if username_taken > 0 {
        return Err(UserError::ValidationError(
            "Username already taken".to_string(),
        ));
    }

    let password_hash = hash_password(&input.password)?;
    let created_at = OffsetDateTime::now_utc().unix_timestamp();

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (email, username, first_name, last_name, password_hash, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         RETURNING id",
    )
    .bind(&input.email)
    .bind(&input.username)
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(&password_hash)
    .bind(created_at)
    .fetch_one(pool)
    .await?;

    tracing::info!(user_id = id, "user registered");

    Ok(User {
        id,
        email: input.email,
        username: input.username,
        first_name: input.first_name,
        last_name: input.last_name,
        password_hash,
        created_at,
    })
}

/// Check credentials for token issuance
///
/// A missing account and a wrong password produce the same fixed error so the
/// endpoint cannot be used for user enumeration.
pub async fn authenticate_user(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> UserResult<User> {
    let user = query_user_by_email(pool, email)
        .await?
        .ok_or(UserError::InvalidCredentials)?;

    if !verify_password(password, &user.password_hash)? {
        tracing::warn!(email = %email, "failed login attempt");
        return Err(UserError::InvalidCredentials);
    }

    Ok(user)
}

/// Replace the caller's password after re-checking the current one
pub async fn change_password(
    pool: &SqlitePool,
    user_id: i64,
    input: ChangePasswordInput,
) -> UserResult<()> {
    input
        .validate()
        .map_err(|e| UserError::ValidationError(e.to_string()))?;

    let user = query_user_by_id(pool, user_id)
        .await?
        .ok_or(UserError::NotFound)?;

    if !verify_password(&input.current_password, &user.password_hash)? {
        return Err(UserError::InvalidCredentials);
    }

    let password_hash = hash_password(&input.new_password)?;

    sqlx::query("UPDATE users SET password_hash = ?1 WHERE id = ?2")
        .bind(&password_hash)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn query_user_by_id(pool: &SqlitePool, id: i64) -> UserResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, username, first_name, last_name, password_hash, created_at
         FROM users WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn query_user_by_email(pool: &SqlitePool, email: &str) -> UserResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, username, first_name, last_name, password_hash, created_at
         FROM users WHERE email = ?1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Profile for `user_id` as seen by `viewer` (drives `is_subscribed`)
pub async fn query_user_profile(
    pool: &SqlitePool,
    user_id: i64,
    viewer: Option<i64>,
) -> UserResult<UserProfile> {
    let user = query_user_by_id(pool, user_id)
        .await?
        .ok_or(UserError::NotFound)?;

    let is_subscribed = match viewer {
        Some(viewer_id) => {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM subscriptions WHERE user_id = ?1 AND author_id = ?2",
            )
            .bind(viewer_id)
            .bind(user_id)
            .fetch_one(pool)
            .await?
                > 0
        }
        None => false,
    };

    Ok(UserProfile {
        email: user.email,
        id: user.id,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        is_subscribed,
    })
}

/// List accounts ordered by id with limit/offset paging
pub async fn query_users(
    pool: &SqlitePool,
    viewer: Option<i64>,
    limit: i64,
    offset: i64,
) -> UserResult<(i64, Vec<UserProfile>)> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM users ORDER BY id LIMIT ?1 OFFSET ?2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let mut profiles = Vec::with_capacity(ids.len());
    for id in ids {
        profiles.push(query_user_profile(pool, id, viewer).await?);
    }

    Ok((count, profiles))
}
