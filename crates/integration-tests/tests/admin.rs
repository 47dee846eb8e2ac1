//! Admin back office: role enforcement, order lifecycle, categories,
//! dashboard.

use std::str::FromStr;

use axum::http::StatusCode;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use summit_integration_tests::{TestApp, seed_product};

use summit_core::ProductId;

fn checkout_body(id: ProductId, unit_price: &str, quantity: i32) -> Value {
    json!({
        "customer_name": "Avery Quinn",
        "customer_email": "avery@example.com",
        "shipping_address": "12 Ridge Road",
        "city": "Denver",
        "items": [{
            "product_id": id,
            "product_name": "Trail Shoe",
            "product_image": null,
            "unit_price": unit_price,
            "quantity": quantity,
        }],
    })
}

#[tokio::test]
async fn admin_routes_reject_regular_users() {
    let app = TestApp::new();
    let token = app.register("Avery", "avery@example.com").await;

    let (status, body) = app.get("/api/admin/stats", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Admin access required");

    let (status, _) = app.get("/api/admin/stats", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn order_status_moves_forward_only() {
    let app = TestApp::new();
    let buyer = app.register("Avery", "avery@example.com").await;
    let admin = app.register_admin("admin@example.com").await;
    let shoe = seed_product(&app, "Trail Shoe", dec!(120), 10).await;

    app.post("/api/orders", Some(&buyer), checkout_body(shoe.id, "120", 1))
        .await;
    let (_, orders) = app.get("/api/admin/orders", Some(&admin)).await;
    let order_id = orders[0]["id"].as_i64().unwrap();
    let status_uri = format!("/api/admin/orders/{order_id}/status");

    // Skipping a step is rejected.
    let (status, _) = app
        .put(&status_uri, Some(&admin), json!({ "status": "shipped" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The forward path works step by step.
    for next in ["processing", "shipped", "delivered"] {
        let (status, body) = app
            .put(&status_uri, Some(&admin), json!({ "status": next }))
            .await;
        assert_eq!(status, StatusCode::OK, "transition to {next} failed: {body}");
    }

    // Delivered is terminal; cancellation is no longer possible.
    let (status, _) = app
        .put(&status_uri, Some(&admin), json!({ "status": "cancelled" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put(&status_uri, Some(&admin), json!({ "status": "not-a-status" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pending_orders_can_be_cancelled() {
    let app = TestApp::new();
    let buyer = app.register("Avery", "avery@example.com").await;
    let admin = app.register_admin("admin@example.com").await;
    let shoe = seed_product(&app, "Trail Shoe", dec!(120), 10).await;

    app.post("/api/orders", Some(&buyer), checkout_body(shoe.id, "120", 1))
        .await;
    let (_, orders) = app.get("/api/admin/orders", Some(&admin)).await;
    let order_id = orders[0]["id"].as_i64().unwrap();

    let (status, _) = app
        .put(
            &format!("/api/admin/orders/{order_id}/status"),
            Some(&admin),
            json!({ "status": "cancelled" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, filtered) = app
        .get("/api/admin/orders?status=cancelled", Some(&admin))
        .await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);
    let (_, filtered) = app
        .get("/api/admin/orders?status=pending", Some(&admin))
        .await;
    assert_eq!(filtered.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn stats_aggregate_revenue_and_counts() {
    let app = TestApp::new();
    let buyer = app.register("Avery", "avery@example.com").await;
    let admin = app.register_admin("admin@example.com").await;
    let shoe = seed_product(&app, "Trail Shoe", dec!(1000), 5).await;
    seed_product(&app, "Low Stock Tent", dec!(289), 2).await;

    app.post("/api/orders", Some(&buyer), checkout_body(shoe.id, "1000", 2))
        .await;

    let (status, body) = app.get("/api/admin/stats", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);

    // 2000 subtotal + 250 shipping.
    let revenue = Decimal::from_str(body["revenue"].as_str().unwrap()).unwrap();
    assert_eq!(revenue, dec!(2250));
    assert_eq!(body["orders"], 1);
    // Admins are not counted as customers.
    assert_eq!(body["users"], 1);
    assert_eq!(body["products"], 2);

    let top = body["top_products"].as_array().unwrap();
    assert_eq!(top[0]["name"], "Trail Shoe");
    assert_eq!(top[0]["sold"], 2);

    // Both products are now under the low-stock threshold (3 and 2 left).
    let low = body["low_stock_products"].as_array().unwrap();
    assert_eq!(low.len(), 2);

    assert_eq!(body["monthly_revenue"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn cancelled_orders_do_not_count_toward_revenue() {
    let app = TestApp::new();
    let buyer = app.register("Avery", "avery@example.com").await;
    let admin = app.register_admin("admin@example.com").await;
    let shoe = seed_product(&app, "Trail Shoe", dec!(1000), 5).await;

    app.post("/api/orders", Some(&buyer), checkout_body(shoe.id, "1000", 1))
        .await;
    let (_, orders) = app.get("/api/admin/orders", Some(&admin)).await;
    let order_id = orders[0]["id"].as_i64().unwrap();
    app.put(
        &format!("/api/admin/orders/{order_id}/status"),
        Some(&admin),
        json!({ "status": "cancelled" }),
    )
    .await;

    let (_, body) = app.get("/api/admin/stats", Some(&admin)).await;
    let revenue = Decimal::from_str(body["revenue"].as_str().unwrap()).unwrap();
    assert_eq!(revenue, dec!(0));
    // The order itself still counts.
    assert_eq!(body["orders"], 1);
}

#[tokio::test]
async fn category_crud_with_product_counts() {
    let app = TestApp::new();
    let admin = app.register_admin("admin@example.com").await;

    let (status, body) = app
        .post(
            "/api/admin/categories",
            Some(&admin),
            json!({ "name": "Trail Running", "description": "Off-road" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = body["id"].as_i64().unwrap();

    // Slug is derived from the name.
    let (_, categories) = app.get("/api/categories", None).await;
    assert_eq!(categories[0]["slug"], "trail-running");

    // Duplicate slug is a conflict.
    let (status, _) = app
        .post(
            "/api/admin/categories",
            Some(&admin),
            json!({ "name": "Trail Running" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .put(
            &format!("/api/admin/categories/{category_id}"),
            Some(&admin),
            json!({ "name": "Trail & Fell Running" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listing) = app.get("/api/admin/categories", Some(&admin)).await;
    assert_eq!(listing[0]["name"], "Trail & Fell Running");
    assert_eq!(listing[0]["product_count"], 0);

    let (status, _) = app
        .delete(
            &format!("/api/admin/categories/{category_id}"),
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, categories) = app.get("/api/categories", None).await;
    assert_eq!(categories.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn customer_listing_excludes_admins() {
    let app = TestApp::new();
    app.register("Avery", "avery@example.com").await;
    app.register("Blake", "blake@example.com").await;
    let admin = app.register_admin("admin@example.com").await;

    let (status, body) = app.get("/api/admin/users", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u["role"] == "user"));
}

#[tokio::test]
async fn admin_product_search_filters_the_full_catalog() {
    let app = TestApp::new();
    let admin = app.register_admin("admin@example.com").await;
    seed_product(&app, "Ridgeline Trail Runner", dec!(140), 5).await;
    seed_product(&app, "Switchback Tent", dec!(289), 5).await;

    let (_, body) = app.get("/api/admin/products", Some(&admin)).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = app
        .get("/api/admin/products?search=ridgeline", Some(&admin))
        .await;
    let products = body.as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Ridgeline Trail Runner");
}
