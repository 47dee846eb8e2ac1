//! Cart and wishlist domain types.

use rust_decimal::Decimal;
use serde::Serialize;

use summit_core::ProductId;

/// A cart row joined with the catalog fields the storefront renders.
///
/// Also reused for wishlist listings (with `quantity` fixed at 1 there is no
/// separate shape worth carrying).
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub images: Vec<String>,
    pub stock: i32,
    pub rating: Decimal,
    pub quantity: i32,
}
