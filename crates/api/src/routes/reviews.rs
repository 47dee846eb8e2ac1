//! Review routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;

use summit_core::ProductId;

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::Review;
use crate::state::AppState;
use crate::store::{NewReview, StoreError};

pub fn router() -> Router<AppState> {
    Router::new().route("/{product_id}", get(list).post(add))
}

#[derive(Debug, Deserialize)]
struct ReviewInput {
    rating: i32,
    comment: Option<String>,
}

async fn list(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Vec<Review>>> {
    let reviews = state.store().reviews_for_product(product_id).await?;
    Ok(Json(reviews))
}

/// Submit a review. Inserting the review and refreshing the product's mean
/// rating and review count happen as one unit in the store.
async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<ProductId>,
    Json(input): Json<ReviewInput>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    if !(1..=5).contains(&input.rating) {
        return Err(AppError::BadRequest("Rating 1-5 required".to_string()));
    }
    state
        .store()
        .add_review(NewReview {
            product_id,
            user_id: user.id,
            user_name: user.name,
            rating: input.rating,
            comment: input.comment,
        })
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::NotFound("Product not found".to_string()),
            other => other.into(),
        })?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Review added" })),
    ))
}
