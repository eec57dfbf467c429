use axum::{
    Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tower_http::{services::ServeDir, trace::TraceLayer};

mod auth;
mod health;
mod ingredients;
mod recipes;
mod tags;
mod users;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: crate::config::Config,
}

/// Limit/offset paging parameters shared by the list endpoints
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    10
}

/// Envelope for paginated list responses
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub results: Vec<T>,
}

pub fn router(state: AppState) -> Router {
    let media_root = state.config.media.root.clone();

    let api = Router::new()
        .route("/auth/token/login", post(auth::login))
        .route("/auth/token/logout", post(auth::logout))
        .route("/users", get(users::list).post(users::register))
        .route("/users/me", get(users::me))
        .route("/users/set_password", post(users::set_password))
        .route("/users/subscriptions", get(users::subscriptions))
        .route("/users/{id}", get(users::detail))
        .route(
            "/users/{id}/subscribe",
            post(users::subscribe).delete(users::unsubscribe),
        )
        .route("/tags", get(tags::list))
        .route("/tags/{id}", get(tags::detail))
        .route("/ingredients", get(ingredients::list))
        .route("/ingredients/{id}", get(ingredients::detail))
        .route("/recipes", get(recipes::list).post(recipes::create))
        .route(
            "/recipes/download_shopping_cart",
            get(recipes::download_shopping_cart),
        )
        .route(
            "/recipes/{id}",
            get(recipes::detail)
                .patch(recipes::update)
                .delete(recipes::delete),
        )
        .route(
            "/recipes/{id}/favorite",
            post(recipes::add_favorite).delete(recipes::remove_favorite),
        )
        .route(
            "/recipes/{id}/shopping_cart",
            post(recipes::add_to_cart).delete(recipes::remove_from_cart),
        );

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .nest("/api", api)
        .nest_service("/media", ServeDir::new(media_root))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
