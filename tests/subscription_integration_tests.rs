mod common;

use axum::http::StatusCode;
use common::{body_json, create_test_app};
use serde_json::json;

#[tokio::test]
async fn test_subscribe_returns_author_profile_with_recipes() {
    let app = create_test_app().await;
    let ids = app.seed_catalog().await;
    let author = app.register_and_login("author@example.com", "author").await;
    let reader = app.register_and_login("reader@example.com", "reader").await;

    app.create_recipe(
        &author,
        "Soup",
        json!([{ "id": ids[0], "amount": 5 }]),
        json!([1]),
    )
    .await;

    let response = app
        .request("POST", "/api/users/1/subscribe", Some(&reader), None)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["username"], "author");
    assert_eq!(body["is_subscribed"], true);
    assert_eq!(body["recipes_count"], 1);
    assert_eq!(body["recipes"][0]["name"], "Soup");
}

#[tokio::test]
async fn test_self_subscription_is_rejected() {
    let app = create_test_app().await;
    let token = app.register_and_login("solo@example.com", "solo").await;

    let response = app
        .request("POST", "/api/users/1/subscribe", Some(&token), None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["errors"], "You cannot subscribe to yourself!");
}

#[tokio::test]
async fn test_duplicate_subscription_is_rejected() {
    let app = create_test_app().await;
    app.register_and_login("author@example.com", "author").await;
    let reader = app.register_and_login("reader@example.com", "reader").await;

    let response = app
        .request("POST", "/api/users/1/subscribe", Some(&reader), None)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .request("POST", "/api/users/1/subscribe", Some(&reader), None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["errors"], "You are already subscribed!");
}

#[tokio::test]
async fn test_unsubscribe_without_subscription_is_rejected() {
    let app = create_test_app().await;
    app.register_and_login("author@example.com", "author").await;
    let reader = app.register_and_login("reader@example.com", "reader").await;

    let response = app
        .request("DELETE", "/api/users/1/subscribe", Some(&reader), None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["errors"], "Subscription does not exist!");
}

#[tokio::test]
async fn test_subscribe_to_missing_user_is_not_found() {
    let app = create_test_app().await;
    let reader = app.register_and_login("reader@example.com", "reader").await;

    let response = app
        .request("POST", "/api/users/99/subscribe", Some(&reader), None)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recipes_limit_caps_attached_recipes() {
    let app = create_test_app().await;
    let ids = app.seed_catalog().await;
    let author = app.register_and_login("author@example.com", "author").await;
    let reader = app.register_and_login("reader@example.com", "reader").await;

    for name in ["One", "Two", "Three"] {
        app.create_recipe(
            &author,
            name,
            json!([{ "id": ids[0], "amount": 1 }]),
            json!([1]),
        )
        .await;
    }

    let response = app
        .request(
            "POST",
            "/api/users/1/subscribe?recipes_limit=2",
            Some(&reader),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["recipes_count"], 3);
    let recipes = body["recipes"].as_array().unwrap();
    assert_eq!(recipes.len(), 2);
    // Most recent first
    assert_eq!(recipes[0]["name"], "Three");
}

#[tokio::test]
async fn test_subscriptions_list_shows_followed_authors() {
    let app = create_test_app().await;
    app.seed_catalog().await;
    app.register_and_login("first@example.com", "first").await;
    app.register_and_login("second@example.com", "second").await;
    let reader = app.register_and_login("reader@example.com", "reader").await;

    for author_id in [1, 2] {
        let response = app
            .request(
                "POST",
                &format!("/api/users/{author_id}/subscribe"),
                Some(&reader),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .request("GET", "/api/users/subscriptions", Some(&reader), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let profiles = body.as_array().unwrap();
    assert_eq!(profiles.len(), 2);
    assert!(profiles.iter().all(|p| p["is_subscribed"] == true));
}

#[tokio::test]
async fn test_is_subscribed_flag_on_user_detail() {
    let app = create_test_app().await;
    app.register_and_login("author@example.com", "author").await;
    let reader = app.register_and_login("reader@example.com", "reader").await;

    app.request("POST", "/api/users/1/subscribe", Some(&reader), None)
        .await;

    let response = app.request("GET", "/api/users/1", Some(&reader), None).await;
    let body = body_json(response).await;
    assert_eq!(body["is_subscribed"], true);

    // Anonymous viewers always see false
    let response = app.request("GET", "/api/users/1", None, None).await;
    let body = body_json(response).await;
    assert_eq!(body["is_subscribed"], false);
}
