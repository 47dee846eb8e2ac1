//! Cart routes. All require authentication; the cart is keyed by the
//! authenticated user, never by a cart ID.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde::Deserialize;
use serde_json::json;

use summit_core::ProductId;

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::CartLine;
use crate::state::AppState;
use crate::store::StoreError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(items).post(add).delete(clear))
        .route("/{product_id}", put(set_quantity).delete(remove))
}

const fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
struct AddInput {
    product_id: ProductId,
    #[serde(default = "default_quantity")]
    quantity: i32,
}

#[derive(Debug, Deserialize)]
struct QuantityInput {
    quantity: i32,
}

async fn items(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<CartLine>>> {
    let items = state.store().cart_items(user.id).await?;
    Ok(Json(items))
}

async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<AddInput>,
) -> Result<Json<serde_json::Value>> {
    if input.quantity < 1 {
        return Err(AppError::BadRequest("Quantity must be at least 1".to_string()));
    }
    state
        .store()
        .add_to_cart(user.id, input.product_id, input.quantity)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::NotFound("Product not found".to_string()),
            other => other.into(),
        })?;
    Ok(Json(json!({ "message": "Added to cart" })))
}

/// Set an absolute quantity; below 1 removes the line.
async fn set_quantity(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<ProductId>,
    Json(input): Json<QuantityInput>,
) -> Result<Json<serde_json::Value>> {
    state
        .store()
        .set_cart_quantity(user.id, product_id, input.quantity)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::NotFound("Item not found in cart".to_string()),
            other => other.into(),
        })?;
    Ok(Json(json!({ "message": "Cart updated" })))
}

async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<ProductId>,
) -> Result<Json<serde_json::Value>> {
    state.store().remove_from_cart(user.id, product_id).await?;
    Ok(Json(json!({ "message": "Removed from cart" })))
}

async fn clear(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<serde_json::Value>> {
    state.store().clear_cart(user.id).await?;
    Ok(Json(json!({ "message": "Cart cleared" })))
}
