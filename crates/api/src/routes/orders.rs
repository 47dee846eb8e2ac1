//! Checkout and order-history routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde_json::json;

use summit_core::OrderId;

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::Order;
use crate::services::orders::{CheckoutInput, place_order};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(place))
        .route("/my", get(my_orders))
        .route("/{id}", get(detail))
}

async fn place(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CheckoutInput>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let order = place_order(state.store().as_ref(), user.id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Order placed successfully",
            "orderNumber": order.order_number,
            "orderId": order.id,
        })),
    ))
}

async fn my_orders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Order>>> {
    let orders = state.store().orders_for_user(user.id).await?;
    Ok(Json(orders))
}

/// A user can only ever see their own orders; someone else's order ID is
/// indistinguishable from a missing one.
async fn detail(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = state
        .store()
        .get_order_for_user(id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
    Ok(Json(order))
}
