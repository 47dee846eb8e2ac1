//! Review submission and rating aggregation.

use std::str::FromStr;

use axum::http::StatusCode;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use summit_integration_tests::{TestApp, seed_product};

use summit_api::store::Store;

#[tokio::test]
async fn reviews_update_the_product_mean_rating() {
    let app = TestApp::new();
    let product = seed_product(&app, "Trail Shoe", dec!(120), 10).await;

    for (i, rating) in [5, 4, 4].iter().enumerate() {
        let token = app
            .register("Reviewer", &format!("reviewer{i}@example.com"))
            .await;
        let (status, _) = app
            .post(
                &format!("/api/reviews/{}", product.id),
                Some(&token),
                json!({ "rating": rating, "comment": "Solid" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // Mean of 5, 4, 4 rounded to two decimal places.
    let product = app.store.get_product(product.id).await.unwrap().unwrap();
    assert_eq!(product.rating, Decimal::from_str("4.33").unwrap());
    assert_eq!(product.review_count, 3);
}

#[tokio::test]
async fn review_carries_the_author_name_snapshot() {
    let app = TestApp::new();
    let product = seed_product(&app, "Trail Shoe", dec!(120), 10).await;
    let token = app.register("Avery Quinn", "avery@example.com").await;

    app.post(
        &format!("/api/reviews/{}", product.id),
        Some(&token),
        json!({ "rating": 5, "comment": "Great grip on scree" }),
    )
    .await;

    let (status, body) = app
        .get(&format!("/api/reviews/{}", product.id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let reviews = body.as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["user_name"], "Avery Quinn");
    assert_eq!(reviews[0]["rating"], 5);
    assert_eq!(reviews[0]["comment"], "Great grip on scree");
}

#[tokio::test]
async fn out_of_range_ratings_are_rejected() {
    let app = TestApp::new();
    let product = seed_product(&app, "Trail Shoe", dec!(120), 10).await;
    let token = app.register("Avery", "avery@example.com").await;

    for rating in [0, 6, -1] {
        let (status, body) = app
            .post(
                &format!("/api/reviews/{}", product.id),
                Some(&token),
                json!({ "rating": rating }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Rating 1-5 required");
    }

    // Nothing was recorded.
    let product = app.store.get_product(product.id).await.unwrap().unwrap();
    assert_eq!(product.review_count, 0);
}

#[tokio::test]
async fn reviewing_an_unknown_product_is_a_404() {
    let app = TestApp::new();
    let token = app.register("Avery", "avery@example.com").await;

    let (status, _) = app
        .post("/api/reviews/999", Some(&token), json!({ "rating": 4 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn submitting_a_review_requires_auth() {
    let app = TestApp::new();
    let product = seed_product(&app, "Trail Shoe", dec!(120), 10).await;

    let (status, _) = app
        .post(
            &format!("/api/reviews/{}", product.id),
            None,
            json!({ "rating": 4 }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Reading reviews is public.
    let (status, _) = app
        .get(&format!("/api/reviews/{}", product.id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}
