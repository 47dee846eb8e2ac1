//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use summit_core::{CategoryId, ProductId};

/// A catalog product.
///
/// `rating`, `review_count`, and `sold_count` are derived fields: the review
/// aggregator and the order engine maintain them, nothing else writes them.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// URL-safe unique slug.
    pub slug: String,
    /// Long-form description.
    pub description: Option<String>,
    /// Free-form specifications text.
    pub specifications: Option<String>,
    /// Brand name, used for filtering and search.
    pub brand: Option<String>,
    /// List price.
    pub price: Decimal,
    /// Discounted price overriding `price` at checkout when present.
    pub discount_price: Option<Decimal>,
    /// Units currently in stock.
    pub stock: i32,
    /// Mean review rating (0 to 5, two decimal places).
    pub rating: Decimal,
    /// Number of reviews behind `rating`.
    pub review_count: i32,
    /// Cumulative units ever ordered.
    pub sold_count: i32,
    /// Owning category, if any.
    pub category_id: Option<CategoryId>,
    /// Image references (paths under the upload dir or external URLs).
    pub images: Vec<String>,
    /// Shown in the "featured" merchandising rail.
    pub is_featured: bool,
    /// Shown in the "trending" merchandising rail.
    pub is_trending: bool,
    /// Shown in the "new arrivals" merchandising rail.
    pub is_new_arrival: bool,
    /// Shown in the "best sellers" merchandising rail.
    pub is_best_seller: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// The price a buyer actually pays: the discount price when set,
    /// otherwise the list price.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.discount_price.unwrap_or(self.price)
    }
}

/// Compact product shape returned by autocomplete search.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub images: Vec<String>,
}

impl From<&Product> for ProductSummary {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            price: p.price,
            discount_price: p.discount_price,
            images: p.images.clone(),
        }
    }
}
