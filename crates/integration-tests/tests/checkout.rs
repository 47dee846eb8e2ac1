//! Checkout and order lifecycle from the buyer's side.

use std::str::FromStr;

use axum::http::StatusCode;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use summit_integration_tests::{TestApp, seed_product};

use summit_api::models::{NewOrderLine, OrderDraft};
use summit_api::store::{Store, StoreError};
use summit_core::ProductId;

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal serialized as string")).unwrap()
}

fn checkout_body(items: Value) -> Value {
    json!({
        "customer_name": "Avery Quinn",
        "customer_email": "avery@example.com",
        "shipping_address": "12 Ridge Road",
        "city": "Denver",
        "items": items,
    })
}

fn line(id: ProductId, name: &str, unit_price: &str, quantity: i32) -> Value {
    json!({
        "product_id": id,
        "product_name": name,
        "product_image": null,
        "unit_price": unit_price,
        "quantity": quantity,
    })
}

#[tokio::test]
async fn placing_an_order_decrements_stock_and_clears_the_cart() {
    let app = TestApp::new();
    let token = app.register("Avery", "avery@example.com").await;
    let shoe = seed_product(&app, "Trail Shoe", dec!(1200), 10).await;
    let socks = seed_product(&app, "Wool Socks", dec!(50), 20).await;

    // Checkout normally follows an add-to-cart flow.
    app.post(
        "/api/cart",
        Some(&token),
        json!({ "product_id": shoe.id, "quantity": 2 }),
    )
    .await;

    let (status, body) = app
        .post(
            "/api/orders",
            Some(&token),
            checkout_body(json!([
                line(shoe.id, "Trail Shoe", "1200", 2),
                line(socks.id, "Wool Socks", "50", 1),
            ])),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "checkout failed: {body}");
    assert_eq!(body["message"], "Order placed successfully");
    let order_number = body["orderNumber"].as_str().unwrap();
    assert!(order_number.starts_with("ORD-"));

    // Stock moved down, sold counts moved up, by exactly the line
    // quantities.
    let shoe_now = app.store.get_product(shoe.id).await.unwrap().unwrap();
    assert_eq!(shoe_now.stock, 8);
    assert_eq!(shoe_now.sold_count, 2);
    let socks_now = app.store.get_product(socks.id).await.unwrap().unwrap();
    assert_eq!(socks_now.stock, 19);
    assert_eq!(socks_now.sold_count, 1);

    // Cart was cleared as part of the same unit.
    let (_, cart) = app.get("/api/cart", Some(&token)).await;
    assert_eq!(cart.as_array().unwrap().len(), 0);

    // Totals: 2450 subtotal is under the free-shipping threshold.
    let (_, orders) = app.get("/api/orders/my", Some(&token)).await;
    let order = &orders.as_array().unwrap()[0];
    assert_eq!(decimal(&order["subtotal"]), dec!(2450));
    assert_eq!(decimal(&order["shipping_fee"]), dec!(250));
    assert_eq!(decimal(&order["total"]), dec!(2700));
    assert_eq!(order["status"], "pending");
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn large_orders_ship_free() {
    let app = TestApp::new();
    let token = app.register("Avery", "avery@example.com").await;
    let bike = seed_product(&app, "Gravel Bike", dec!(5200), 3).await;

    let (_, _) = app
        .post(
            "/api/orders",
            Some(&token),
            checkout_body(json!([line(bike.id, "Gravel Bike", "5200", 1)])),
        )
        .await;

    let (_, orders) = app.get("/api/orders/my", Some(&token)).await;
    let order = &orders.as_array().unwrap()[0];
    assert_eq!(decimal(&order["shipping_fee"]), dec!(0));
    assert_eq!(decimal(&order["total"]), dec!(5200));
}

#[tokio::test]
async fn oversell_fails_the_whole_order() {
    let app = TestApp::new();
    let token = app.register("Avery", "avery@example.com").await;
    let shoe = seed_product(&app, "Trail Shoe", dec!(120), 10).await;
    let tent = seed_product(&app, "Tent", dec!(289), 1).await;

    let (status, _) = app
        .post(
            "/api/orders",
            Some(&token),
            checkout_body(json!([
                line(shoe.id, "Trail Shoe", "120", 2),
                line(tent.id, "Tent", "289", 5),
            ])),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // All-or-nothing: the in-stock line was not decremented either, and no
    // order exists.
    let shoe_now = app.store.get_product(shoe.id).await.unwrap().unwrap();
    assert_eq!(shoe_now.stock, 10);
    assert_eq!(shoe_now.sold_count, 0);
    let tent_now = app.store.get_product(tent.id).await.unwrap().unwrap();
    assert_eq!(tent_now.stock, 1);

    let (_, orders) = app.get("/api/orders/my", Some(&token)).await;
    assert_eq!(orders.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn empty_orders_are_rejected() {
    let app = TestApp::new();
    let token = app.register("Avery", "avery@example.com").await;

    let (status, body) = app
        .post("/api/orders", Some(&token), checkout_body(json!([])))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No items in order");
}

#[tokio::test]
async fn ordering_an_unknown_product_is_a_404() {
    let app = TestApp::new();
    let token = app.register("Avery", "avery@example.com").await;

    let (status, _) = app
        .post(
            "/api/orders",
            Some(&token),
            checkout_body(json!([line(ProductId::new(999), "Ghost", "10", 1)])),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_snapshots_survive_catalog_edits() {
    let app = TestApp::new();
    let token = app.register("Avery", "avery@example.com").await;
    let shoe = seed_product(&app, "Trail Shoe", dec!(120), 10).await;

    app.post(
        "/api/orders",
        Some(&token),
        checkout_body(json!([line(shoe.id, "Trail Shoe", "120", 1)])),
    )
    .await;

    // Deleting the product must not rewrite order history.
    app.store.delete_product(shoe.id).await.unwrap();

    let (_, orders) = app.get("/api/orders/my", Some(&token)).await;
    let items = orders[0]["items"].as_array().unwrap();
    assert_eq!(items[0]["product_name"], "Trail Shoe");
    assert_eq!(decimal(&items[0]["unit_price"]), dec!(120));
}

#[tokio::test]
async fn colliding_order_numbers_are_a_conflict() {
    let app = TestApp::new();
    app.register("Avery", "avery@example.com").await;
    let shoe = seed_product(&app, "Trail Shoe", dec!(120), 10).await;

    let (user, _) = app
        .store
        .find_user_by_email("avery@example.com")
        .await
        .unwrap()
        .unwrap();

    // Two drafts carrying the same order number; only the first may land.
    let draft = OrderDraft {
        order_number: "ORD-1723200000000-7".to_string(),
        user_id: user.id,
        customer_name: "Avery Quinn".to_string(),
        customer_email: "avery@example.com".to_string(),
        customer_phone: None,
        shipping_address: "12 Ridge Road".to_string(),
        city: "Denver".to_string(),
        notes: None,
        subtotal: dec!(120),
        shipping_fee: dec!(250),
        total: dec!(370),
        items: vec![NewOrderLine {
            product_id: shoe.id,
            product_name: "Trail Shoe".to_string(),
            product_image: None,
            unit_price: dec!(120),
            quantity: 1,
        }],
    };

    app.store.create_order(draft.clone()).await.unwrap();

    let err = app.store.create_order(draft).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)), "got {err:?}");

    // The rejected attempt left no trace: one order, one unit reserved.
    let shoe_now = app.store.get_product(shoe.id).await.unwrap().unwrap();
    assert_eq!(shoe_now.stock, 9);
    assert_eq!(shoe_now.sold_count, 1);
    let orders = app.store.orders_for_user(user.id).await.unwrap();
    assert_eq!(orders.len(), 1);
}

#[tokio::test]
async fn users_cannot_see_each_others_orders() {
    let app = TestApp::new();
    let avery = app.register("Avery", "avery@example.com").await;
    let blake = app.register("Blake", "blake@example.com").await;
    let shoe = seed_product(&app, "Trail Shoe", dec!(120), 10).await;

    app.post(
        "/api/orders",
        Some(&avery),
        checkout_body(json!([line(shoe.id, "Trail Shoe", "120", 1)])),
    )
    .await;

    let (_, orders) = app.get("/api/orders/my", Some(&avery)).await;
    let order_id = orders[0]["id"].as_i64().unwrap();

    let (status, _) = app
        .get(&format!("/api/orders/{order_id}"), Some(&blake))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .get(&format!("/api/orders/{order_id}"), Some(&avery))
        .await;
    assert_eq!(status, StatusCode::OK);
}
