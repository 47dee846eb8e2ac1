//! Catalog browsing: filters, sorting, pagination, autocomplete.

use axum::http::StatusCode;
use rust_decimal_macros::dec;
use summit_core::slugify;
use summit_integration_tests::{TestApp, seed_product};

use summit_api::store::{NewCategory, NewProduct, Store};

async fn seed_categorized(app: &TestApp, name: &str, category: &str, price: rust_decimal::Decimal) {
    let categories = app.store.list_categories().await.unwrap();
    let category_id = match categories.iter().find(|c| c.name == category) {
        Some(c) => c.id,
        None => {
            app.store
                .create_category(NewCategory {
                    name: category.to_string(),
                    slug: slugify(category),
                    description: None,
                    image: None,
                })
                .await
                .unwrap()
                .id
        }
    };
    app.store
        .create_product(NewProduct {
            name: name.to_string(),
            slug: slugify(name),
            description: None,
            specifications: None,
            brand: Some("Basecamp".to_string()),
            price,
            discount_price: None,
            stock: 10,
            category_id: Some(category_id),
            images: Vec::new(),
            is_featured: false,
            is_trending: false,
            is_new_arrival: false,
            is_best_seller: false,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn listing_reports_totals_and_pages() {
    let app = TestApp::new();
    for i in 0..15 {
        seed_product(&app, &format!("Product {i}"), dec!(10), 5).await;
    }

    let (status, body) = app.get("/api/products?limit=12", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 15);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pages"], 2);
    assert_eq!(body["products"].as_array().unwrap().len(), 12);

    let (_, body) = app.get("/api/products?limit=12&page=2", None).await;
    assert_eq!(body["products"].as_array().unwrap().len(), 3);
    assert_eq!(body["page"], 2);
}

#[tokio::test]
async fn price_filters_and_sort_combine() {
    let app = TestApp::new();
    seed_product(&app, "Cheap", dec!(20), 5).await;
    seed_product(&app, "Mid", dec!(80), 5).await;
    seed_product(&app, "Spendy", dec!(300), 5).await;

    let (status, body) = app
        .get("/api/products?minPrice=50&maxPrice=200&sort=price_asc", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let products = body["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Mid");
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn sort_orders_by_price() {
    let app = TestApp::new();
    seed_product(&app, "B", dec!(200), 5).await;
    seed_product(&app, "A", dec!(100), 5).await;
    seed_product(&app, "C", dec!(300), 5).await;

    let (_, body) = app.get("/api/products?sort=price_asc", None).await;
    let names: Vec<&str> = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["A", "B", "C"]);

    let (_, body) = app.get("/api/products?sort=price_desc", None).await;
    let names: Vec<&str> = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["C", "B", "A"]);
}

#[tokio::test]
async fn category_filter_matches_by_slug() {
    let app = TestApp::new();
    seed_categorized(&app, "Trail Shoe", "Running", dec!(120)).await;
    seed_categorized(&app, "Road Helmet", "Cycling", dec!(90)).await;

    let (_, body) = app.get("/api/products?category=running", None).await;
    let products = body["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Trail Shoe");
}

#[tokio::test]
async fn unknown_category_slug_drops_the_constraint() {
    let app = TestApp::new();
    seed_categorized(&app, "Trail Shoe", "Running", dec!(120)).await;
    seed_categorized(&app, "Road Helmet", "Cycling", dec!(90)).await;

    // An unknown slug is ignored rather than matching nothing.
    let (status, body) = app.get("/api/products?category=no-such-category", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn in_stock_filter_hides_sold_out_products() {
    let app = TestApp::new();
    seed_product(&app, "Available", dec!(50), 3).await;
    seed_product(&app, "Sold Out", dec!(50), 0).await;

    let (_, body) = app.get("/api/products?inStock=true", None).await;
    let products = body["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Available");
}

#[tokio::test]
async fn search_matches_name_and_brand() {
    let app = TestApp::new();
    seed_product(&app, "Ridgeline Trail Runner", dec!(140), 5).await;
    seed_product(&app, "Tempo Road Shoe", dec!(160), 5).await;

    let (_, body) = app.get("/api/products?search=ridge", None).await;
    assert_eq!(body["total"], 1);

    // Every seeded product carries the brand "Cairn".
    let (_, body) = app.get("/api/products?search=cairn", None).await;
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn autocomplete_requires_two_characters_and_caps_results() {
    let app = TestApp::new();
    for i in 0..12 {
        seed_product(&app, &format!("Trekking Pole {i}"), dec!(45), 5).await;
    }

    let (status, body) = app.get("/api/products/search?q=t", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);

    let (_, body) = app.get("/api/products/search?q=trek", None).await;
    assert_eq!(body.as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn brands_are_distinct_and_sorted() {
    let app = TestApp::new();
    seed_product(&app, "One", dec!(10), 5).await;
    seed_product(&app, "Two", dec!(10), 5).await;

    let (_, body) = app.get("/api/products/brands", None).await;
    assert_eq!(body, serde_json::json!(["Cairn"]));
}

#[tokio::test]
async fn detail_returns_product_with_reviews() {
    let app = TestApp::new();
    let product = seed_product(&app, "Switchback 2 Tent", dec!(289), 5).await;

    let (status, body) = app
        .get(&format!("/api/products/{}", product.id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"]["name"], "Switchback 2 Tent");
    assert_eq!(body["reviews"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn missing_product_is_a_404() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/products/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn related_products_share_the_category() {
    let app = TestApp::new();
    seed_categorized(&app, "Trail Shoe", "Running", dec!(120)).await;
    seed_categorized(&app, "Road Shoe", "Running", dec!(150)).await;
    seed_categorized(&app, "Helmet", "Cycling", dec!(90)).await;

    let products = app
        .store
        .admin_list_products(Some("Trail Shoe"))
        .await
        .unwrap();
    let trail_shoe = &products[0];

    let (_, body) = app
        .get(&format!("/api/products/{}/related", trail_shoe.id), None)
        .await;
    let related = body.as_array().unwrap();
    assert_eq!(related.len(), 1);
    assert_eq!(related[0]["name"], "Road Shoe");
}

#[tokio::test]
async fn categories_listing_is_public() {
    let app = TestApp::new();
    seed_categorized(&app, "Trail Shoe", "Running", dec!(120)).await;

    let (status, body) = app.get("/api/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["slug"], "running");
}
