mod common;

use axum::http::{StatusCode, header};
use common::{body_text, create_test_app};
use serde_json::json;

#[tokio::test]
async fn test_download_sums_amounts_across_recipes() {
    let app = create_test_app().await;
    let ids = app.seed_catalog().await;
    let token = app.register_and_login("chef@example.com", "chef").await;

    let soup = app
        .create_recipe(
            &token,
            "Soup",
            json!([{ "id": ids[0], "amount": 5 }, { "id": ids[2], "amount": 200 }]),
            json!([2]),
        )
        .await;
    let bread = app
        .create_recipe(
            &token,
            "Bread",
            json!([{ "id": ids[0], "amount": 10 }, { "id": ids[1], "amount": 3 }]),
            json!([1]),
        )
        .await;

    for id in [soup, bread] {
        let response = app
            .request(
                "POST",
                &format!("/api/recipes/{id}/shopping_cart"),
                Some(&token),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .request(
            "GET",
            "/api/recipes/download_shopping_cart",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=my_shopping_cart.txt"
    );

    let report = body_text(response).await;
    assert_eq!(
        report,
        "Shopping list:\n\n1. Milk 200 (ml)\n2. Salt 15 (g)\n3. Sugar 3 (g)"
    );
}

#[tokio::test]
async fn test_download_empty_cart_returns_fixed_message() {
    let app = create_test_app().await;
    app.seed_catalog().await;
    let token = app.register_and_login("chef@example.com", "chef").await;

    let response = app
        .request(
            "GET",
            "/api/recipes/download_shopping_cart",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let report = body_text(response).await;
    assert_eq!(report, "Shopping cart is empty!");
}

#[tokio::test]
async fn test_download_requires_authentication() {
    let app = create_test_app().await;

    let response = app
        .request("GET", "/api/recipes/download_shopping_cart", None, None)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_carts_are_isolated_per_user() {
    let app = create_test_app().await;
    let ids = app.seed_catalog().await;
    let chef = app.register_and_login("chef@example.com", "chef").await;
    let guest = app.register_and_login("guest@example.com", "guest").await;

    let recipe_id = app
        .create_recipe(
            &chef,
            "Soup",
            json!([{ "id": ids[0], "amount": 5 }]),
            json!([1]),
        )
        .await;

    let response = app
        .request(
            "POST",
            &format!("/api/recipes/{recipe_id}/shopping_cart"),
            Some(&chef),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .request(
            "GET",
            "/api/recipes/download_shopping_cart",
            Some(&guest),
            None,
        )
        .await;

    let report = body_text(response).await;
    assert_eq!(report, "Shopping cart is empty!");
}
