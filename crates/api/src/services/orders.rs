//! Checkout order engine.
//!
//! Validates a checkout payload, computes totals and the order number, and
//! hands a fully-priced draft to the storage adapter, which persists the
//! header, line snapshots, stock decrements, and cart clear as one atomic
//! unit.

use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use summit_core::{ProductId, UserId};

use crate::models::{NewOrderLine, Order, OrderDraft};
use crate::store::{Store, StoreError};

/// Orders with a subtotal strictly above this ship for free.
const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);
/// Flat shipping fee below the free-shipping threshold.
const SHIPPING_FEE: Decimal = Decimal::from_parts(250, 0, 0, false, 0);

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("No items in order")]
    Empty,

    #[error("Invalid quantity for product {0}")]
    InvalidQuantity(ProductId),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    #[error("Insufficient stock for product {0}")]
    InsufficientStock(ProductId),

    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for OrderError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InsufficientStock(id) => Self::InsufficientStock(id),
            StoreError::NotFound => Self::Store(StoreError::NotFound),
            other => Self::Store(other),
        }
    }
}

/// Checkout payload as submitted by the client. Line items carry the
/// client's catalog snapshot (name, image, unit price).
#[derive(Debug, Deserialize)]
pub struct CheckoutInput {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub shipping_address: String,
    pub city: String,
    pub notes: Option<String>,
    pub items: Vec<NewOrderLine>,
}

/// Validate a checkout payload and compute its totals into a draft.
///
/// # Errors
///
/// Returns `OrderError` if the payload has no items, a non-positive
/// quantity, or a missing required field.
pub fn build_draft(user_id: UserId, input: CheckoutInput) -> Result<OrderDraft, OrderError> {
    if input.items.is_empty() {
        return Err(OrderError::Empty);
    }
    for line in &input.items {
        if line.quantity < 1 {
            return Err(OrderError::InvalidQuantity(line.product_id));
        }
    }
    require_field(&input.customer_name, "customer_name")?;
    require_field(&input.customer_email, "customer_email")?;
    require_field(&input.shipping_address, "shipping_address")?;
    require_field(&input.city, "city")?;

    let subtotal: Decimal = input
        .items
        .iter()
        .map(|line| line.unit_price * Decimal::from(line.quantity))
        .sum();
    let shipping_fee = if subtotal > FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        SHIPPING_FEE
    };

    Ok(OrderDraft {
        order_number: generate_order_number(),
        user_id,
        customer_name: input.customer_name,
        customer_email: input.customer_email,
        customer_phone: input.customer_phone,
        shipping_address: input.shipping_address,
        city: input.city,
        notes: input.notes,
        subtotal,
        shipping_fee,
        total: subtotal + shipping_fee,
        items: input.items,
    })
}

/// Place an order: validate, price, and persist atomically.
///
/// The adapter rejects any line whose quantity exceeds current stock and
/// rolls the whole order back, so a placed order has always decremented
/// stock for every line and cleared the user's cart.
///
/// # Errors
///
/// Returns `OrderError` on validation failure, oversell, or storage
/// failure.
pub async fn place_order(
    store: &dyn Store,
    user_id: UserId,
    input: CheckoutInput,
) -> Result<Order, OrderError> {
    let draft = build_draft(user_id, input)?;
    Ok(store.create_order(draft).await?)
}

/// Generate a human-readable order number: `ORD-<unix millis>-<0..999>`.
///
/// Uniqueness is enforced by the store; a collision surfaces as a conflict
/// rather than being retried here.
fn generate_order_number() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = rand::rng().random_range(0..1000);
    format!("ORD-{millis}-{suffix}")
}

fn require_field(value: &str, name: &'static str) -> Result<(), OrderError> {
    if value.trim().is_empty() {
        return Err(OrderError::MissingField(name));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn line(id: i32, price: Decimal, quantity: i32) -> NewOrderLine {
        NewOrderLine {
            product_id: ProductId::new(id),
            product_name: format!("Product {id}"),
            product_image: None,
            unit_price: price,
            quantity,
        }
    }

    fn input(items: Vec<NewOrderLine>) -> CheckoutInput {
        CheckoutInput {
            customer_name: "Avery Quinn".to_string(),
            customer_email: "avery@example.com".to_string(),
            customer_phone: None,
            shipping_address: "12 Ridge Road".to_string(),
            city: "Denver".to_string(),
            notes: None,
            items,
        }
    }

    #[test]
    fn totals_include_flat_shipping_below_threshold() {
        let draft = build_draft(
            UserId::new(1),
            input(vec![line(1, dec!(1200), 2), line(2, dec!(50), 1)]),
        )
        .unwrap();
        assert_eq!(draft.subtotal, dec!(2450));
        assert_eq!(draft.shipping_fee, dec!(250));
        assert_eq!(draft.total, dec!(2700));
    }

    #[test]
    fn shipping_is_free_above_threshold() {
        let draft = build_draft(UserId::new(1), input(vec![line(1, dec!(5001), 1)])).unwrap();
        assert_eq!(draft.shipping_fee, Decimal::ZERO);
        assert_eq!(draft.total, dec!(5001));
    }

    #[test]
    fn subtotal_exactly_at_threshold_still_pays_shipping() {
        let draft = build_draft(UserId::new(1), input(vec![line(1, dec!(5000), 1)])).unwrap();
        assert_eq!(draft.shipping_fee, dec!(250));
        assert_eq!(draft.total, dec!(5250));
    }

    #[test]
    fn empty_item_list_is_rejected() {
        assert!(matches!(
            build_draft(UserId::new(1), input(vec![])),
            Err(OrderError::Empty)
        ));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        assert!(matches!(
            build_draft(UserId::new(1), input(vec![line(1, dec!(10), 0)])),
            Err(OrderError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn blank_required_field_is_rejected() {
        let mut payload = input(vec![line(1, dec!(10), 1)]);
        payload.city = "  ".to_string();
        assert!(matches!(
            build_draft(UserId::new(1), payload),
            Err(OrderError::MissingField("city"))
        ));
    }

    #[test]
    fn order_number_has_expected_shape() {
        let number = generate_order_number();
        let mut parts = number.splitn(3, '-');
        assert_eq!(parts.next(), Some("ORD"));
        assert!(parts.next().unwrap().parse::<i64>().is_ok());
        let suffix: u32 = parts.next().unwrap().parse().unwrap();
        assert!(suffix < 1000);
    }
}
