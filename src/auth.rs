use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use foodgram_user::{query_user_by_id, validate_jwt};

use crate::error::ApiError;
use crate::routes::AppState;

/// Extractor for endpoints that require an authenticated caller.
/// Validates the bearer token and checks the account still exists.
#[derive(Clone, Debug)]
pub struct AuthUser(pub i64);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Unauthorized)?;

        let claims = validate_jwt(bearer.token(), &state.config.jwt.secret).map_err(|e| {
            tracing::warn!("Invalid bearer token: {}", e);
            ApiError::Unauthorized
        })?;

        match query_user_by_id(&state.pool, claims.sub).await? {
            Some(user) => Ok(AuthUser(user.id)),
            None => {
                tracing::warn!(user_id = claims.sub, "token for deleted user rejected");
                Err(ApiError::Unauthorized)
            }
        }
    }
}

/// Extractor for public endpoints whose representation depends on the viewer
/// (`is_subscribed`, `is_favorited`, ...). A missing or invalid token simply
/// yields an anonymous viewer.
#[derive(Clone, Debug)]
pub struct MaybeUser(pub Option<i64>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        // Only a missing/invalid token downgrades to anonymous; a failed
        // account lookup is a real error and must surface
        match AuthUser::from_request_parts(parts, state).await {
            Ok(AuthUser(user_id)) => Ok(MaybeUser(Some(user_id))),
            Err(ApiError::Unauthorized) => Ok(MaybeUser(None)),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;
    use foodgram_user::generate_jwt;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::config::{
        Config, DatabaseConfig, JwtConfig, MediaConfig, ObservabilityConfig, ServerConfig,
    };

    const SECRET: &str = "test_secret_key_minimum_32_characters_long";

    fn test_state(pool: sqlx::SqlitePool) -> AppState {
        AppState {
            pool,
            config: Config {
                server: ServerConfig {
                    host: "127.0.0.1".to_string(),
                    port: 3000,
                },
                database: DatabaseConfig {
                    url: "sqlite::memory:".to_string(),
                    max_connections: 1,
                },
                jwt: JwtConfig {
                    secret: SECRET.to_string(),
                    expiration_days: 7,
                },
                media: MediaConfig::default(),
                observability: ObservabilityConfig::default(),
            },
        }
    }

    fn parts_with_token(token: &str) -> Parts {
        Request::builder()
            .header("authorization", format!("Bearer {token}"))
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn test_maybe_user_is_anonymous_on_bad_token() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        let state = test_state(pool);

        let mut parts = parts_with_token("not-a-jwt");
        let MaybeUser(viewer) = MaybeUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();

        assert_eq!(viewer, None);
    }

    #[tokio::test]
    async fn test_maybe_user_surfaces_store_failure() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool.close().await;
        let state = test_state(pool);

        let token = generate_jwt(1, "chef@example.com".to_string(), SECRET, 7).unwrap();
        let mut parts = parts_with_token(&token);
        let result = MaybeUser::from_request_parts(&mut parts, &state).await;

        assert!(matches!(result, Err(ApiError::UserError(_))));
    }
}
