//! Category domain types.

use serde::Serialize;

use summit_core::CategoryId;

/// A product category. Products reference categories optionally; a product
/// may be uncategorized.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// URL-safe unique slug.
    pub slug: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional image reference.
    pub image: Option<String>,
}

/// A category together with the number of products referencing it, for the
/// admin listing.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: Category,
    pub product_count: i64,
}
