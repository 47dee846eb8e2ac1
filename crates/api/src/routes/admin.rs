//! Admin back-office routes. Every route requires the admin role.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use summit_core::{CategoryId, OrderId, OrderStatus, ProductId, UserId, slugify};

use crate::error::{AppError, Result};
use crate::middleware::AdminUser;
use crate::models::{AdminStats, CategoryWithCount, Order, Product, User};
use crate::services::uploads::{FormField, collect_product_form};
use crate::state::AppState;
use crate::store::{NewCategory, NewProduct, ProductUpdate};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            put(update_category).delete(delete_category),
        )
        .route("/orders", get(list_orders))
        .route("/orders/{id}", get(order_detail))
        .route("/orders/{id}/status", put(set_order_status))
        .route("/users", get(list_users))
        .route("/users/{id}/orders", get(user_orders))
}

// =============================================================================
// Dashboard
// =============================================================================

async fn stats(State(state): State<AppState>, _admin: AdminUser) -> Result<Json<AdminStats>> {
    let stats = state.store().admin_stats().await?;
    Ok(Json(stats))
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Deserialize)]
struct ProductSearchQuery {
    search: Option<String>,
}

async fn list_products(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ProductSearchQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = state
        .store()
        .admin_list_products(query.search.as_deref())
        .await?;
    Ok(Json(products))
}

/// Multipart product form flattened into text fields plus saved image URLs.
struct ProductForm {
    text: HashMap<String, String>,
    uploaded_images: Vec<String>,
}

impl ProductForm {
    async fn from_multipart(state: &AppState, multipart: Multipart) -> Result<Self> {
        let fields = collect_product_form(&state.config().upload_dir, multipart).await?;
        let mut text = HashMap::new();
        let mut uploaded_images = Vec::new();
        for field in fields {
            match field {
                FormField::Text { name, value } => {
                    text.insert(name, value);
                }
                FormField::Image { url } => uploaded_images.push(url),
            }
        }
        Ok(Self {
            text,
            uploaded_images,
        })
    }

    /// A text field, with empty strings treated as absent.
    fn text(&self, name: &str) -> Option<&str> {
        self.text.get(name).map(String::as_str).filter(|v| !v.is_empty())
    }

    fn required(&self, name: &str) -> Result<&str> {
        self.text(name)
            .ok_or_else(|| AppError::BadRequest(format!("Missing field: {name}")))
    }

    fn decimal(&self, name: &str) -> Result<Option<Decimal>> {
        self.text(name)
            .map(|v| {
                v.parse()
                    .map_err(|_| AppError::BadRequest(format!("Invalid number in {name}")))
            })
            .transpose()
    }

    fn flag(&self, name: &str) -> bool {
        self.text(name) == Some("true")
    }

    /// Previously saved image URLs the client kept, as a JSON array.
    /// Malformed JSON falls back to an empty list.
    fn existing_images(&self) -> Vec<String> {
        self.text("existing_images")
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }
}

async fn create_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let form = ProductForm::from_multipart(&state, multipart).await?;

    let name = form.required("name")?.to_string();
    let price = form
        .decimal("price")?
        .ok_or_else(|| AppError::BadRequest("Missing field: price".to_string()))?;
    // Slug gets a millisecond suffix so repeated names stay unique.
    let slug = format!("{}-{}", slugify(&name), Utc::now().timestamp_millis());

    let product = state
        .store()
        .create_product(NewProduct {
            name,
            slug,
            description: form.text("description").map(str::to_string),
            specifications: form.text("specifications").map(str::to_string),
            brand: form.text("brand").map(str::to_string),
            price,
            discount_price: form.decimal("discount_price")?,
            stock: parse_stock(&form)?,
            category_id: parse_category_id(&form),
            images: form.uploaded_images.clone(),
            is_featured: form.flag("is_featured"),
            is_trending: form.flag("is_trending"),
            is_new_arrival: form.flag("is_new_arrival"),
            is_best_seller: form.flag("is_best_seller"),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Product created", "id": product.id })),
    ))
}

async fn update_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>> {
    let form = ProductForm::from_multipart(&state, multipart).await?;

    let name = form.required("name")?.to_string();
    let price = form
        .decimal("price")?
        .ok_or_else(|| AppError::BadRequest("Missing field: price".to_string()))?;

    // Kept images come first, freshly uploaded ones append after them.
    let mut images = form.existing_images();
    images.extend(form.uploaded_images.iter().cloned());

    state
        .store()
        .update_product(
            id,
            ProductUpdate {
                name,
                description: form.text("description").map(str::to_string),
                specifications: form.text("specifications").map(str::to_string),
                brand: form.text("brand").map(str::to_string),
                price,
                discount_price: form.decimal("discount_price")?,
                stock: parse_stock(&form)?,
                category_id: parse_category_id(&form),
                images,
                is_featured: form.flag("is_featured"),
                is_trending: form.flag("is_trending"),
                is_new_arrival: form.flag("is_new_arrival"),
                is_best_seller: form.flag("is_best_seller"),
            },
        )
        .await?;

    Ok(Json(json!({ "message": "Product updated" })))
}

fn parse_stock(form: &ProductForm) -> Result<i32> {
    form.text("stock")
        .map_or(Ok(0), |v| {
            v.parse()
                .map_err(|_| AppError::BadRequest("Invalid number in stock".to_string()))
        })
}

fn parse_category_id(form: &ProductForm) -> Option<CategoryId> {
    form.text("category_id")
        .and_then(|v| v.parse().ok())
        .map(CategoryId::new)
}

async fn delete_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<ProductId>,
) -> Result<Json<serde_json::Value>> {
    state.store().delete_product(id).await?;
    Ok(Json(json!({ "message": "Product deleted" })))
}

// =============================================================================
// Categories
// =============================================================================

#[derive(Debug, Deserialize)]
struct CategoryInput {
    name: String,
    description: Option<String>,
    image: Option<String>,
}

async fn list_categories(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<CategoryWithCount>>> {
    let categories = state.store().list_categories_with_counts().await?;
    Ok(Json(categories))
}

async fn create_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let category = state
        .store()
        .create_category(NewCategory {
            slug: slugify(&input.name),
            name: input.name,
            description: input.description,
            image: input.image,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Category created", "id": category.id })),
    ))
}

async fn update_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<CategoryId>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<serde_json::Value>> {
    state
        .store()
        .update_category(
            id,
            NewCategory {
                slug: slugify(&input.name),
                name: input.name,
                description: input.description,
                image: input.image,
            },
        )
        .await?;
    Ok(Json(json!({ "message": "Category updated" })))
}

async fn delete_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<CategoryId>,
) -> Result<Json<serde_json::Value>> {
    state.store().delete_category(id).await?;
    Ok(Json(json!({ "message": "Category deleted" })))
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Deserialize)]
struct OrderListQuery {
    status: Option<String>,
}

async fn list_orders(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<Order>>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(|_| AppError::BadRequest("Invalid status".to_string()))?;
    let orders = state.store().list_orders(status).await?;
    Ok(Json(orders))
}

async fn order_detail(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = state
        .store()
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
    Ok(Json(order))
}

#[derive(Debug, Deserialize)]
struct StatusInput {
    status: String,
}

/// Move an order along its lifecycle. Orders only move forward
/// (pending, processing, shipped, delivered); cancellation is allowed from
/// any non-terminal status.
async fn set_order_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<OrderId>,
    Json(input): Json<StatusInput>,
) -> Result<Json<serde_json::Value>> {
    let next: OrderStatus = input
        .status
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid status".to_string()))?;

    let order = state
        .store()
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    if !order.status.can_transition_to(next) {
        return Err(AppError::BadRequest(format!(
            "Cannot move order from {} to {}",
            order.status, next
        )));
    }

    state.store().set_order_status(id, next).await?;
    Ok(Json(json!({ "message": "Order status updated" })))
}

// =============================================================================
// Users
// =============================================================================

async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<User>>> {
    let users = state.store().list_customers().await?;
    Ok(Json(users))
}

async fn user_orders(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<UserId>,
) -> Result<Json<Vec<Order>>> {
    let orders = state.store().orders_for_user(id).await?;
    Ok(Json(orders))
}
