//! Public catalog routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use summit_core::ProductId;

use crate::error::{AppError, Result};
use crate::models::ProductSummary;
use crate::state::AppState;
use crate::store::{FeaturedBuckets, ProductFilter, ProductListing, ProductPage, ProductSort};

/// Minimum query length before autocomplete returns matches.
const AUTOCOMPLETE_MIN_CHARS: usize = 2;
/// Autocomplete result cap.
const AUTOCOMPLETE_LIMIT: i64 = 8;
/// Cap on each merchandising rail.
const FEATURED_LIMIT: i64 = 8;
/// Cap on the related-products strip.
const RELATED_LIMIT: i64 = 4;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/search", get(search))
        .route("/featured", get(featured))
        .route("/brands", get(brands))
        .route("/{id}", get(detail))
        .route("/{id}/related", get(related))
}

/// Catalog query string. Every filter is optional and they combine
/// conjunctively.
#[derive(Debug, Deserialize)]
struct CatalogQuery {
    /// Category slug.
    category: Option<String>,
    brand: Option<String>,
    #[serde(rename = "minPrice")]
    min_price: Option<Decimal>,
    #[serde(rename = "maxPrice")]
    max_price: Option<Decimal>,
    /// Minimum mean rating.
    rating: Option<Decimal>,
    #[serde(rename = "inStock")]
    in_stock: Option<String>,
    sort: Option<String>,
    search: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ProductListing>> {
    let filter = ProductFilter {
        category_slug: query.category,
        brand: query.brand,
        min_price: query.min_price,
        max_price: query.max_price,
        min_rating: query.rating,
        in_stock: query.in_stock.as_deref() == Some("true"),
        search: query.search,
    };
    let sort = ProductSort::from_param(query.sort.as_deref());
    let page = ProductPage::clamped(query.page, query.limit);
    let listing = state.store().list_products(&filter, sort, page).await?;
    Ok(Json(listing))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ProductSummary>>> {
    let Some(q) = query.q.filter(|q| q.chars().count() >= AUTOCOMPLETE_MIN_CHARS) else {
        return Ok(Json(Vec::new()));
    };
    let matches = state.store().autocomplete(&q, AUTOCOMPLETE_LIMIT).await?;
    Ok(Json(matches))
}

async fn featured(State(state): State<AppState>) -> Result<Json<FeaturedBuckets>> {
    let buckets = state.store().featured_buckets(FEATURED_LIMIT).await?;
    Ok(Json(buckets))
}

async fn brands(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let brands = state.store().brands().await?;
    Ok(Json(brands))
}

/// Product detail: the product plus its reviews, newest first.
async fn detail(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<serde_json::Value>> {
    let product = state
        .store()
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    let reviews = state.store().reviews_for_product(id).await?;
    Ok(Json(json!({ "product": product, "reviews": reviews })))
}

/// Products from the same category. An unknown product yields an empty
/// list, not a 404.
async fn related(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Vec<crate::models::Product>>> {
    let related = state.store().related_products(id, RELATED_LIMIT).await?;
    Ok(Json(related))
}
