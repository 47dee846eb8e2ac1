//! Admin dashboard aggregates. Read-only reporting shapes, no mutation.

use rust_decimal::Decimal;
use serde::Serialize;

use summit_core::ProductId;

use super::Product;

/// Everything the admin dashboard renders in one payload.
#[derive(Debug, Clone, Serialize)]
pub struct AdminStats {
    /// Total revenue over non-cancelled orders.
    pub revenue: Decimal,
    /// Total order count (all statuses).
    pub orders: i64,
    /// Customer count (role `user` only).
    pub users: i64,
    /// Product count.
    pub products: i64,
    /// Revenue per month over the trailing six months, oldest first.
    pub monthly_revenue: Vec<MonthlyRevenue>,
    /// Top five products by cumulative units sold.
    pub top_products: Vec<TopProduct>,
    /// Products with stock below the low-stock threshold (at most ten).
    pub low_stock_products: Vec<Product>,
}

/// One month of revenue, keyed `YYYY-MM`.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub total: Decimal,
}

/// A product ranked by units sold across all order lines.
#[derive(Debug, Clone, Serialize)]
pub struct TopProduct {
    pub product_id: ProductId,
    pub name: String,
    pub sold: i64,
}
