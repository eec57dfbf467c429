pub mod auth;
pub mod config;
pub mod error;
pub mod media;
pub mod observability;
pub mod routes;

pub use routes::AppState;

/// Create the app router for testing
///
/// Builds the full Axum router against the given pool, useful for
/// integration tests that drive the API without starting a server.
pub fn create_app(pool: sqlx::SqlitePool, config: config::Config) -> axum::Router {
    routes::router(AppState { pool, config })
}
