#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use foodgram::config::{
    Config, DatabaseConfig, JwtConfig, MediaConfig, ObservabilityConfig, ServerConfig,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .unwrap();

    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    pool
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: "test_secret_key_minimum_32_characters_long".to_string(),
            expiration_days: 7,
        },
        media: MediaConfig::default(),
        observability: ObservabilityConfig::default(),
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

pub async fn create_test_app() -> TestApp {
    let pool = setup_test_db().await;
    let router = foodgram::create_app(pool.clone(), test_config());

    TestApp { router, pool }
}

impl TestApp {
    /// Fire one request at the router; `token` adds a bearer header
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Register an account and log in, returning its bearer token
    pub async fn register_and_login(&self, email: &str, username: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/users",
                None,
                Some(json!({
                    "email": email,
                    "username": username,
                    "first_name": "Test",
                    "last_name": "User",
                    "password": "s3cure-password",
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = self
            .request(
                "POST",
                "/api/auth/token/login",
                None,
                Some(json!({ "email": email, "password": "s3cure-password" })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        body["auth_token"].as_str().unwrap().to_string()
    }

    /// Seed the default tags plus a small ingredient catalog, returning the
    /// ingredient ids in insertion order
    pub async fn seed_catalog(&self) -> Vec<i64> {
        foodgram_recipe::seed_tags(&self.pool).await.unwrap();

        let mut ids = Vec::new();
        for (name, unit) in [("Salt", "g"), ("Sugar", "g"), ("Milk", "ml")] {
            let id = sqlx::query_scalar::<_, i64>(
                "INSERT INTO ingredients (name, measurement_unit) VALUES (?1, ?2) RETURNING id",
            )
            .bind(name)
            .bind(unit)
            .fetch_one(&self.pool)
            .await
            .unwrap();
            ids.push(id);
        }

        ids
    }

    /// Create a recipe through the API and return its id
    pub async fn create_recipe(
        &self,
        token: &str,
        name: &str,
        ingredients: Value,
        tags: Value,
    ) -> i64 {
        let response = self
            .request(
                "POST",
                "/api/recipes",
                Some(token),
                Some(json!({
                    "name": name,
                    "text": "Mix and cook.",
                    "cooking_time": 10,
                    "tags": tags,
                    "ingredients": ingredients,
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        body["id"].as_i64().unwrap()
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
