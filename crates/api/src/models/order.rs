//! Order domain types.
//!
//! An order is immutable after creation except for its status. Line items
//! are point-in-time snapshots of the catalog: product name, image, and
//! unit price are denormalized at order time so later catalog edits never
//! retroactively alter historical orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use summit_core::{OrderId, OrderStatus, ProductId, UserId};

/// A durable order with its line-item snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Human-readable order identifier (`ORD-<millis>-<n>`).
    pub order_number: String,
    /// User who placed the order.
    pub user_id: UserId,
    /// Customer contact snapshot.
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    /// Shipping destination snapshot.
    pub shipping_address: String,
    pub city: String,
    /// Free-form order notes.
    pub notes: Option<String>,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Sum of `unit_price * quantity` over all lines, fixed at creation.
    pub subtotal: Decimal,
    /// Flat shipping fee applied at creation (zero above the free-shipping
    /// threshold).
    pub shipping_fee: Decimal,
    /// `subtotal + shipping_fee`, fixed at creation.
    pub total: Decimal,
    /// Line-item snapshots.
    pub items: Vec<OrderLine>,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

/// A single product snapshot within an order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_image: Option<String>,
    pub unit_price: Decimal,
    pub quantity: i32,
}

/// A fully computed order ready for the storage adapter.
///
/// The order engine validates the checkout payload and computes totals and
/// the order number; the adapter persists this draft atomically.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub order_number: String,
    pub user_id: UserId,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub shipping_address: String,
    pub city: String,
    pub notes: Option<String>,
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub total: Decimal,
    pub items: Vec<NewOrderLine>,
}

/// An incoming line item before it becomes a stored snapshot.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_image: Option<String>,
    pub unit_price: Decimal,
    pub quantity: i32,
}
