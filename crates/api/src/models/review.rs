//! Review domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use summit_core::{ProductId, ReviewId, UserId};

/// A product review. Append-only; inserting one recomputes the parent
/// product's mean rating and review count.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    /// Unique review ID.
    pub id: ReviewId,
    /// Reviewed product.
    pub product_id: ProductId,
    /// Review author.
    pub user_id: UserId,
    /// Author display name snapshot taken at submission time.
    pub user_name: String,
    /// Star rating, 1 to 5.
    pub rating: i32,
    /// Optional free-form comment.
    pub comment: Option<String>,
    /// When the review was submitted.
    pub created_at: DateTime<Utc>,
}
