//! Storage layer: one storage-agnostic interface, two adapters.
//!
//! All business logic lives in [`crate::services`] and the route handlers;
//! adapters implement only storage semantics behind the [`Store`] trait:
//!
//! - [`postgres::PgStore`] - relational adapter over a `sqlx` connection
//!   pool; multi-statement operations run in a single SQL transaction.
//! - [`memory::MemoryStore`] - document-style adapter over in-process maps
//!   guarded by one `RwLock`; the write lock makes every operation atomic.
//!   Also the backend for tests.
//!
//! The backend is selected at startup via `STORE_BACKEND` (see
//! [`crate::config`]); handlers only ever see `Arc<dyn Store>`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use summit_core::{CategoryId, OrderId, OrderStatus, ProductId, UserId};

use crate::models::{
    AdminStats, CartLine, Category, CategoryWithCount, Order, OrderDraft, Product,
    ProductSummary, Review, User,
};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email or order number).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// An order line asked for more units than the product has in stock.
    #[error("insufficient stock for product {0}")]
    InsufficientStock(ProductId),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Payload for creating a user account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
}

/// Profile fields a user may update themselves.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Payload for creating a product (admin).
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub specifications: Option<String>,
    pub brand: Option<String>,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub stock: i32,
    pub category_id: Option<CategoryId>,
    pub images: Vec<String>,
    pub is_featured: bool,
    pub is_trending: bool,
    pub is_new_arrival: bool,
    pub is_best_seller: bool,
}

/// Payload for editing a product (admin). The slug is fixed at creation and
/// never regenerated, so it is absent here.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub name: String,
    pub description: Option<String>,
    pub specifications: Option<String>,
    pub brand: Option<String>,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub stock: i32,
    pub category_id: Option<CategoryId>,
    pub images: Vec<String>,
    pub is_featured: bool,
    pub is_trending: bool,
    pub is_new_arrival: bool,
    pub is_best_seller: bool,
}

/// Payload for creating or replacing a category (admin).
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Payload for inserting a review.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub product_id: ProductId,
    pub user_id: UserId,
    pub user_name: String,
    pub rating: i32,
    pub comment: Option<String>,
}

/// Conjunctive catalog filters; every field is optional.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category_slug: Option<String>,
    pub brand: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_rating: Option<Decimal>,
    pub in_stock: bool,
    /// Case-insensitive substring match against name OR brand.
    pub search: Option<String>,
}

/// Catalog sort orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    /// Newest first (default).
    #[default]
    Newest,
    /// Price ascending.
    PriceAsc,
    /// Price descending.
    PriceDesc,
    /// Most units sold first.
    Popular,
    /// Highest rated first.
    Rating,
}

impl ProductSort {
    /// Map the query-string value to a sort order; unknown values fall back
    /// to newest-first.
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("price_asc") => Self::PriceAsc,
            Some("price_desc") => Self::PriceDesc,
            Some("popular") => Self::Popular,
            Some("rating") => Self::Rating,
            _ => Self::Newest,
        }
    }
}

/// Offset pagination: `offset = (page - 1) * limit`.
#[derive(Debug, Clone, Copy)]
pub struct ProductPage {
    pub page: u32,
    pub limit: u32,
}

impl Default for ProductPage {
    fn default() -> Self {
        Self { page: 1, limit: 12 }
    }
}

impl ProductPage {
    /// Clamp page to at least 1 and limit to 1..=100.
    #[must_use]
    pub fn clamped(page: Option<u32>, limit: Option<u32>) -> Self {
        let defaults = Self::default();
        Self {
            page: page.unwrap_or(defaults.page).max(1),
            limit: limit.unwrap_or(defaults.limit).clamp(1, 100),
        }
    }

    /// Rows to skip before this page.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

/// One page of catalog results plus the totals the client paginates with.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProductListing {
    pub products: Vec<Product>,
    pub total: i64,
    pub page: u32,
    pub pages: i64,
}

/// The four merchandising rails on the home page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FeaturedBuckets {
    pub featured: Vec<Product>,
    pub trending: Vec<Product>,
    #[serde(rename = "newArrivals")]
    pub new_arrivals: Vec<Product>,
    #[serde(rename = "bestSellers")]
    pub best_sellers: Vec<Product>,
}

/// Storage interface implemented by both adapters.
///
/// Multi-entity operations (`create_order`, `add_review`) are atomic units
/// of work: either every side effect is visible afterwards or none is.
#[async_trait]
pub trait Store: Send + Sync {
    // =========================================================================
    // Health
    // =========================================================================

    /// Verify the backing store is reachable (readiness probe).
    async fn ping(&self) -> Result<(), StoreError>;

    // =========================================================================
    // Users
    // =========================================================================

    /// Create a user. Fails with [`StoreError::Conflict`] when the email is
    /// already registered.
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError>;

    /// Look up a user by email, returning the stored credential hash
    /// alongside the profile for login verification.
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, StoreError>;

    /// Get a user by ID.
    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Get a user's credential hash by ID.
    async fn get_user_password_hash(&self, id: UserId) -> Result<String, StoreError>;

    /// Update profile fields.
    async fn update_profile(&self, id: UserId, update: ProfileUpdate) -> Result<(), StoreError>;

    /// Replace a user's credential hash.
    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), StoreError>;

    /// All customer accounts (role `user`), newest first.
    async fn list_customers(&self) -> Result<Vec<User>, StoreError>;

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Filtered, sorted, paginated catalog page with the total count over
    /// the same filter set.
    async fn list_products(
        &self,
        filter: &ProductFilter,
        sort: ProductSort,
        page: ProductPage,
    ) -> Result<ProductListing, StoreError>;

    /// Name/brand substring matches for autocomplete, capped at `limit`.
    async fn autocomplete(&self, query: &str, limit: i64)
    -> Result<Vec<ProductSummary>, StoreError>;

    /// The four merchandising rails, each capped at `limit`.
    async fn featured_buckets(&self, limit: i64) -> Result<FeaturedBuckets, StoreError>;

    /// Distinct non-empty brand names, sorted.
    async fn brands(&self) -> Result<Vec<String>, StoreError>;

    /// Get a product by ID.
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Products sharing the category, excluding the product itself.
    async fn related_products(
        &self,
        id: ProductId,
        limit: i64,
    ) -> Result<Vec<Product>, StoreError>;

    /// Create a product (admin).
    async fn create_product(&self, new: NewProduct) -> Result<Product, StoreError>;

    /// Replace a product's editable fields (admin).
    async fn update_product(&self, id: ProductId, update: ProductUpdate)
    -> Result<(), StoreError>;

    /// Delete a product (admin). Deleting an absent product is a no-op.
    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError>;

    /// Full catalog for the admin table, newest first, optionally filtered
    /// by a name/brand substring.
    async fn admin_list_products(&self, search: Option<&str>)
    -> Result<Vec<Product>, StoreError>;

    // =========================================================================
    // Categories
    // =========================================================================

    /// All categories ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// All categories with their product counts (admin).
    async fn list_categories_with_counts(&self) -> Result<Vec<CategoryWithCount>, StoreError>;

    /// Create a category (admin). Fails with [`StoreError::Conflict`] on a
    /// duplicate slug.
    async fn create_category(&self, new: NewCategory) -> Result<Category, StoreError>;

    /// Replace a category (admin).
    async fn update_category(&self, id: CategoryId, new: NewCategory)
    -> Result<(), StoreError>;

    /// Delete a category (admin). Products referencing it become
    /// uncategorized.
    async fn delete_category(&self, id: CategoryId) -> Result<(), StoreError>;

    // =========================================================================
    // Cart
    // =========================================================================

    /// The user's cart joined with current catalog fields.
    async fn cart_items(&self, user_id: UserId) -> Result<Vec<CartLine>, StoreError>;

    /// Add a product to the cart, incrementing the quantity when the row
    /// already exists.
    async fn add_to_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), StoreError>;

    /// Set a cart row to an absolute quantity; a quantity below 1 removes
    /// the row entirely.
    async fn set_cart_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), StoreError>;

    /// Remove a product from the cart. Removing an absent row is a no-op.
    async fn remove_from_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), StoreError>;

    /// Delete all of the user's cart rows.
    async fn clear_cart(&self, user_id: UserId) -> Result<(), StoreError>;

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// The user's wishlist joined with current catalog fields.
    async fn wishlist(&self, user_id: UserId) -> Result<Vec<CartLine>, StoreError>;

    /// Add a product to the wishlist. Adding a duplicate is a no-op, not an
    /// error.
    async fn add_to_wishlist(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), StoreError>;

    /// Remove a product from the wishlist. Removing an absent entry is a
    /// no-op.
    async fn remove_from_wishlist(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), StoreError>;

    // =========================================================================
    // Orders
    // =========================================================================

    /// THE CORE: persist the order header and line snapshots, conditionally
    /// decrement stock and increment sold counts per line, and clear the
    /// user's cart - as one atomic unit. A line whose conditional decrement
    /// matches no row fails the whole order with
    /// [`StoreError::InsufficientStock`] and nothing is persisted.
    async fn create_order(&self, draft: OrderDraft) -> Result<Order, StoreError>;

    /// All of a user's orders with line items, newest first.
    async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError>;

    /// A single order, only when owned by the given user.
    async fn get_order_for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, StoreError>;

    /// All orders, optionally filtered by status, newest first (admin).
    async fn list_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, StoreError>;

    /// A single order regardless of owner (admin).
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    /// Overwrite an order's status. Transition rules are enforced by the
    /// caller against the fetched order.
    async fn set_order_status(&self, id: OrderId, status: OrderStatus)
    -> Result<(), StoreError>;

    // =========================================================================
    // Reviews
    // =========================================================================

    /// All reviews for a product, newest first.
    async fn reviews_for_product(&self, product_id: ProductId)
    -> Result<Vec<Review>, StoreError>;

    /// Insert a review and recompute the parent product's mean rating
    /// (two decimal places) and review count, in one atomic unit.
    async fn add_review(&self, new: NewReview) -> Result<Review, StoreError>;

    // =========================================================================
    // Reporting
    // =========================================================================

    /// Admin dashboard aggregates.
    async fn admin_stats(&self) -> Result<AdminStats, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_param_mapping() {
        assert_eq!(ProductSort::from_param(None), ProductSort::Newest);
        assert_eq!(ProductSort::from_param(Some("price_asc")), ProductSort::PriceAsc);
        assert_eq!(ProductSort::from_param(Some("price_desc")), ProductSort::PriceDesc);
        assert_eq!(ProductSort::from_param(Some("popular")), ProductSort::Popular);
        assert_eq!(ProductSort::from_param(Some("rating")), ProductSort::Rating);
        assert_eq!(ProductSort::from_param(Some("bogus")), ProductSort::Newest);
    }

    #[test]
    fn test_page_offset() {
        let page = ProductPage::clamped(Some(3), Some(12));
        assert_eq!(page.offset(), 24);
    }

    #[test]
    fn test_page_clamping() {
        let page = ProductPage::clamped(Some(0), Some(500));
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 100);
        let defaults = ProductPage::clamped(None, None);
        assert_eq!(defaults.page, 1);
        assert_eq!(defaults.limit, 12);
    }
}
