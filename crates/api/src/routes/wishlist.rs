//! Wishlist routes. A wishlist is an unordered set of products; adding a
//! duplicate is a quiet no-op.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
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
        .route("/", get(items).post(add))
        .route("/{product_id}", delete(remove))
}

#[derive(Debug, Deserialize)]
struct AddInput {
    product_id: ProductId,
}

async fn items(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<CartLine>>> {
    let items = state.store().wishlist(user.id).await?;
    Ok(Json(items))
}

async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<AddInput>,
) -> Result<Json<serde_json::Value>> {
    state
        .store()
        .add_to_wishlist(user.id, input.product_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::NotFound("Product not found".to_string()),
            other => other.into(),
        })?;
    Ok(Json(json!({ "message": "Added to wishlist" })))
}

async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<ProductId>,
) -> Result<Json<serde_json::Value>> {
    state
        .store()
        .remove_from_wishlist(user.id, product_id)
        .await?;
    Ok(Json(json!({ "message": "Removed from wishlist" })))
}
