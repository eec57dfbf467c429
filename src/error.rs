use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use foodgram_recipe::RecipeError;
use foodgram_shopping::ShoppingError;
use foodgram_user::UserError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication credentials were not provided.")]
    Unauthorized,

    #[error("{0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error(transparent)]
    RecipeError(#[from] RecipeError),

    #[error(transparent)]
    UserError(#[from] UserError),

    #[error(transparent)]
    ShoppingError(#[from] ShoppingError),

    #[error("Internal server error")]
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),

            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),

            ApiError::RecipeError(e) => match e {
                RecipeError::NotFound | RecipeError::IngredientNotFound(_) => {
                    (StatusCode::NOT_FOUND, e.to_string())
                }
                RecipeError::PermissionDenied => (StatusCode::FORBIDDEN, e.to_string()),
                RecipeError::ValidationError(_)
                | RecipeError::AlreadyFavorited
                | RecipeError::NotFavorited
                | RecipeError::AlreadyInCart
                | RecipeError::NotInCart => (StatusCode::BAD_REQUEST, e.to_string()),
                RecipeError::DatabaseError(ref err) => {
                    tracing::error!("Database error: {:?}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An unexpected error occurred. Please try again later.".to_string(),
                    )
                }
                RecipeError::UserError(err) => return ApiError::UserError(err).into_response(),
            },

            ApiError::UserError(e) => match e {
                UserError::NotFound => (StatusCode::NOT_FOUND, e.to_string()),
                UserError::InvalidCredentials
                | UserError::SelfSubscription
                | UserError::AlreadySubscribed
                | UserError::NotSubscribed
                | UserError::ValidationError(_) => (StatusCode::BAD_REQUEST, e.to_string()),
                UserError::TokenError(ref err) => {
                    tracing::warn!("Token error: {}", err);
                    (StatusCode::UNAUTHORIZED, "Invalid token.".to_string())
                }
                UserError::HashingError(ref err) => {
                    tracing::error!("Hashing error: {}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An unexpected error occurred. Please try again later.".to_string(),
                    )
                }
                UserError::DatabaseError(ref err) => {
                    tracing::error!("Database error: {:?}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An unexpected error occurred. Please try again later.".to_string(),
                    )
                }
            },

            ApiError::ShoppingError(ShoppingError::DatabaseError(ref e)) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred. Please try again later.".to_string(),
                )
            }

            ApiError::DatabaseError(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred. Please try again later.".to_string(),
                )
            }

            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred. Please try again later.".to_string(),
                )
            }
        };

        (status, Json(json!({ "errors": message }))).into_response()
    }
}
