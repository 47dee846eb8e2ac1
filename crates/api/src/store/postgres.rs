//! `PostgreSQL` storage adapter.
//!
//! Queries are runtime-checked (`query_as`/`QueryBuilder`) so the workspace
//! builds without a live database. Multi-entity units of work run inside a
//! single SQL transaction; dropping the transaction on the error path rolls
//! everything back.
//!
//! # Migrations
//!
//! Migrations live in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p summit-cli -- migrate
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use summit_core::{CategoryId, OrderId, OrderStatus, ProductId, ReviewId, Role, UserId};

use crate::models::{
    AdminStats, CartLine, Category, CategoryWithCount, MonthlyRevenue, Order, OrderDraft,
    OrderLine, Product, ProductSummary, Review, TopProduct, User,
};

use super::{
    FeaturedBuckets, NewCategory, NewProduct, NewReview, NewUser, ProductFilter, ProductListing,
    ProductPage, ProductSort, ProductUpdate, ProfileUpdate, Store, StoreError,
};

/// Products with stock strictly below this count appear in the low-stock
/// report.
const LOW_STOCK_THRESHOLD: i32 = 10;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Relational storage adapter over a `sqlx` connection pool.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Access the underlying pool (used by the CLI for migrations).
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// =============================================================================
// Row types
// =============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, StoreError> {
        let role: Role = self
            .role
            .parse()
            .map_err(|_| StoreError::DataCorruption(format!("invalid role: {}", self.role)))?;
        Ok(User {
            id: UserId::new(self.id),
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            role,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    slug: String,
    description: Option<String>,
    specifications: Option<String>,
    brand: Option<String>,
    price: Decimal,
    discount_price: Option<Decimal>,
    stock: i32,
    rating: Decimal,
    review_count: i32,
    sold_count: i32,
    category_id: Option<i32>,
    images: Vec<String>,
    is_featured: bool,
    is_trending: bool,
    is_new_arrival: bool,
    is_best_seller: bool,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Self {
            id: ProductId::new(r.id),
            name: r.name,
            slug: r.slug,
            description: r.description,
            specifications: r.specifications,
            brand: r.brand,
            price: r.price,
            discount_price: r.discount_price,
            stock: r.stock,
            rating: r.rating,
            review_count: r.review_count,
            sold_count: r.sold_count,
            category_id: r.category_id.map(CategoryId::new),
            images: r.images,
            is_featured: r.is_featured,
            is_trending: r.is_trending,
            is_new_arrival: r.is_new_arrival,
            is_best_seller: r.is_best_seller,
            created_at: r.created_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, slug, description, specifications, brand, price, \
     discount_price, stock, rating, review_count, sold_count, category_id, images, \
     is_featured, is_trending, is_new_arrival, is_best_seller, created_at";

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    slug: String,
    description: Option<String>,
    image: Option<String>,
}

impl From<CategoryRow> for Category {
    fn from(r: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(r.id),
            name: r.name,
            slug: r.slug,
            description: r.description,
            image: r.image,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    order_number: String,
    user_id: i32,
    customer_name: String,
    customer_email: String,
    customer_phone: Option<String>,
    shipping_address: String,
    city: String,
    notes: Option<String>,
    status: String,
    subtotal: Decimal,
    shipping_fee: Decimal,
    total: Decimal,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderLine>) -> Result<Order, StoreError> {
        let status: OrderStatus = self.status.parse().map_err(|_| {
            StoreError::DataCorruption(format!("invalid order status: {}", self.status))
        })?;
        Ok(Order {
            id: OrderId::new(self.id),
            order_number: self.order_number,
            user_id: UserId::new(self.user_id),
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            shipping_address: self.shipping_address,
            city: self.city,
            notes: self.notes,
            status,
            subtotal: self.subtotal,
            shipping_fee: self.shipping_fee,
            total: self.total,
            items,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    order_id: i32,
    product_id: i32,
    product_name: String,
    product_image: Option<String>,
    unit_price: Decimal,
    quantity: i32,
}

impl From<OrderItemRow> for OrderLine {
    fn from(r: OrderItemRow) -> Self {
        Self {
            product_id: ProductId::new(r.product_id),
            product_name: r.product_name,
            product_image: r.product_image,
            unit_price: r.unit_price,
            quantity: r.quantity,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: i32,
    product_id: i32,
    user_id: i32,
    user_name: String,
    rating: i32,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(r: ReviewRow) -> Self {
        Self {
            id: ReviewId::new(r.id),
            product_id: ProductId::new(r.product_id),
            user_id: UserId::new(r.user_id),
            user_name: r.user_name,
            rating: r.rating,
            comment: r.comment,
            created_at: r.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CartLineRow {
    product_id: i32,
    name: String,
    price: Decimal,
    discount_price: Option<Decimal>,
    images: Vec<String>,
    stock: i32,
    rating: Decimal,
    quantity: i32,
}

impl From<CartLineRow> for CartLine {
    fn from(r: CartLineRow) -> Self {
        Self {
            product_id: ProductId::new(r.product_id),
            name: r.name,
            price: r.price,
            discount_price: r.discount_price,
            images: r.images,
            stock: r.stock,
            rating: r.rating,
            quantity: r.quantity,
        }
    }
}

// =============================================================================
// Error mapping
// =============================================================================

fn conflict_on_unique(e: sqlx::Error, message: &str) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return StoreError::Conflict(message.to_owned());
    }
    StoreError::Database(e)
}

fn not_found_on_fk(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_foreign_key_violation()
    {
        return StoreError::NotFound;
    }
    StoreError::Database(e)
}

// =============================================================================
// Filter building
// =============================================================================

/// Append the conjunctive catalog filters to a query's WHERE clause.
///
/// The listing query and its count query share this builder so the total is
/// always computed over the same filter set.
fn push_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    filter: &ProductFilter,
    category_id: Option<CategoryId>,
) {
    builder.push(" WHERE TRUE");
    if let Some(category_id) = category_id {
        builder.push(" AND category_id = ");
        builder.push_bind(category_id.as_i32());
    }
    if let Some(brand) = &filter.brand {
        builder.push(" AND brand = ");
        builder.push_bind(brand.clone());
    }
    if let Some(min) = filter.min_price {
        builder.push(" AND price >= ");
        builder.push_bind(min);
    }
    if let Some(max) = filter.max_price {
        builder.push(" AND price <= ");
        builder.push_bind(max);
    }
    if let Some(min_rating) = filter.min_rating {
        builder.push(" AND rating >= ");
        builder.push_bind(min_rating);
    }
    if filter.in_stock {
        builder.push(" AND stock > 0");
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        builder.push(" AND (name ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR brand ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
}

const fn sort_clause(sort: ProductSort) -> &'static str {
    match sort {
        ProductSort::Newest => " ORDER BY created_at DESC, id DESC",
        ProductSort::PriceAsc => " ORDER BY price ASC",
        ProductSort::PriceDesc => " ORDER BY price DESC",
        ProductSort::Popular => " ORDER BY sold_count DESC",
        ProductSort::Rating => " ORDER BY rating DESC",
    }
}

impl PgStore {
    async fn resolve_category_slug(
        &self,
        slug: &str,
    ) -> Result<Option<CategoryId>, StoreError> {
        let id: Option<i32> = sqlx::query_scalar("SELECT id FROM categories WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id.map(CategoryId::new))
    }

    /// Fetch order line snapshots for a set of order headers and attach them.
    async fn attach_items(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, StoreError> {
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let item_rows: Vec<OrderItemRow> = sqlx::query_as(
            "SELECT order_id, product_id, product_name, product_image, unit_price, quantity
             FROM order_items WHERE order_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_order: std::collections::HashMap<i32, Vec<OrderLine>> =
            std::collections::HashMap::new();
        for item in item_rows {
            by_order
                .entry(item.order_id)
                .or_default()
                .push(OrderLine::from(item));
        }

        rows.into_iter()
            .map(|row| {
                let items = by_order.remove(&row.id).unwrap_or_default();
                row.into_order(items)
            })
            .collect()
    }
}

const ORDER_COLUMNS: &str = "id, order_number, user_id, customer_name, customer_email, \
     customer_phone, shipping_address, city, notes, status, subtotal, shipping_fee, total, \
     created_at";

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    // =========================================================================
    // Users
    // =========================================================================

    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let row: UserRow = sqlx::query_as(
            "INSERT INTO users (name, email, password_hash, phone)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, email, phone, address, role, created_at",
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "email already registered"))?;
        row.into_user()
    }

    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, StoreError> {
        let row = sqlx::query(
            "SELECT id, name, email, phone, address, role, created_at, password_hash
             FROM users WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let hash: String = row.try_get("password_hash")?;
        let user = UserRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
            role: row.try_get("role")?,
            created_at: row.try_get("created_at")?,
        }
        .into_user()?;
        Ok(Some((user, hash)))
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, name, email, phone, address, role, created_at
             FROM users WHERE id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;
        row.map(UserRow::into_user).transpose()
    }

    async fn get_user_password_hash(&self, id: UserId) -> Result<String, StoreError> {
        sqlx::query_scalar("SELECT password_hash FROM users WHERE id = $1")
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn update_profile(&self, id: UserId, update: ProfileUpdate) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET name = $2, phone = $3, address = $4 WHERE id = $1")
            .bind(id.as_i32())
            .bind(&update.name)
            .bind(&update.phone)
            .bind(&update.address)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id.as_i32())
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_customers(&self) -> Result<Vec<User>, StoreError> {
        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT id, name, email, phone, address, role, created_at
             FROM users WHERE role = 'user' ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(UserRow::into_user).collect()
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    async fn list_products(
        &self,
        filter: &ProductFilter,
        sort: ProductSort,
        page: ProductPage,
    ) -> Result<ProductListing, StoreError> {
        // An unknown category slug drops the constraint rather than
        // returning an empty page.
        let category_id = match &filter.category_slug {
            Some(slug) => self.resolve_category_slug(slug).await?,
            None => None,
        };

        let mut query = QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products"));
        push_filters(&mut query, filter, category_id);
        query.push(sort_clause(sort));
        query.push(" LIMIT ");
        query.push_bind(i64::from(page.limit));
        query.push(" OFFSET ");
        query.push_bind(page.offset());
        let rows: Vec<ProductRow> = query.build_query_as().fetch_all(&self.pool).await?;

        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM products");
        push_filters(&mut count_query, filter, category_id);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let pages = (total + i64::from(page.limit) - 1) / i64::from(page.limit);
        Ok(ProductListing {
            products: rows.into_iter().map(Product::from).collect(),
            total,
            page: page.page,
            pages,
        })
    }

    async fn autocomplete(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<ProductSummary>, StoreError> {
        let pattern = format!("%{query}%");
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE name ILIKE $1 OR brand ILIKE $1 LIMIT $2"
        ))
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(Product::from)
            .map(|p| ProductSummary::from(&p))
            .collect())
    }

    async fn featured_buckets(&self, limit: i64) -> Result<FeaturedBuckets, StoreError> {
        let fetch = |flag: &'static str| {
            let sql =
                format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE {flag} LIMIT $1");
            async move {
                let rows: Vec<ProductRow> = sqlx::query_as(&sql)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?;
                Ok::<_, StoreError>(rows.into_iter().map(Product::from).collect::<Vec<_>>())
            }
        };
        Ok(FeaturedBuckets {
            featured: fetch("is_featured").await?,
            trending: fetch("is_trending").await?,
            new_arrivals: fetch("is_new_arrival").await?,
            best_sellers: fetch("is_best_seller").await?,
        })
    }

    async fn brands(&self) -> Result<Vec<String>, StoreError> {
        let brands: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT brand FROM products
             WHERE brand IS NOT NULL AND brand <> '' ORDER BY brand",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(brands)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Product::from))
    }

    async fn related_products(
        &self,
        id: ProductId,
        limit: i64,
    ) -> Result<Vec<Product>, StoreError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE id <> $1
               AND category_id IS NOT DISTINCT FROM
                   (SELECT category_id FROM products WHERE id = $1)
               AND EXISTS (SELECT 1 FROM products WHERE id = $1)
             LIMIT $2"
        ))
        .bind(id.as_i32())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn create_product(&self, new: NewProduct) -> Result<Product, StoreError> {
        let row: ProductRow = sqlx::query_as(&format!(
            "INSERT INTO products (name, slug, description, specifications, brand, price,
                 discount_price, stock, category_id, images, is_featured, is_trending,
                 is_new_arrival, is_best_seller)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(&new.slug)
        .bind(&new.description)
        .bind(&new.specifications)
        .bind(&new.brand)
        .bind(new.price)
        .bind(new.discount_price)
        .bind(new.stock)
        .bind(new.category_id.map(|id| id.as_i32()))
        .bind(&new.images)
        .bind(new.is_featured)
        .bind(new.is_trending)
        .bind(new.is_new_arrival)
        .bind(new.is_best_seller)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "slug already exists"))?;
        Ok(Product::from(row))
    }

    async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE products SET name = $2, description = $3, specifications = $4, brand = $5,
                 price = $6, discount_price = $7, stock = $8, category_id = $9, images = $10,
                 is_featured = $11, is_trending = $12, is_new_arrival = $13, is_best_seller = $14
             WHERE id = $1",
        )
        .bind(id.as_i32())
        .bind(&update.name)
        .bind(&update.description)
        .bind(&update.specifications)
        .bind(&update.brand)
        .bind(update.price)
        .bind(update.discount_price)
        .bind(update.stock)
        .bind(update.category_id.map(|id| id.as_i32()))
        .bind(&update.images)
        .bind(update.is_featured)
        .bind(update.is_trending)
        .bind(update.is_new_arrival)
        .bind(update.is_best_seller)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn admin_list_products(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<Product>, StoreError> {
        let mut query = QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products"));
        if let Some(search) = search {
            let pattern = format!("%{search}%");
            query.push(" WHERE (name ILIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR brand ILIKE ");
            query.push_bind(pattern);
            query.push(")");
        }
        query.push(" ORDER BY created_at DESC, id DESC");
        let rows: Vec<ProductRow> = query.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    // =========================================================================
    // Categories
    // =========================================================================

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            "SELECT id, name, slug, description, image FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn list_categories_with_counts(&self) -> Result<Vec<CategoryWithCount>, StoreError> {
        let rows = sqlx::query(
            "SELECT c.id, c.name, c.slug, c.description, c.image,
                    COUNT(p.id) AS product_count
             FROM categories c
             LEFT JOIN products p ON p.category_id = c.id
             GROUP BY c.id, c.name, c.slug, c.description, c.image
             ORDER BY c.name",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|row| {
                Ok(CategoryWithCount {
                    category: Category {
                        id: CategoryId::new(row.try_get("id")?),
                        name: row.try_get("name")?,
                        slug: row.try_get("slug")?,
                        description: row.try_get("description")?,
                        image: row.try_get("image")?,
                    },
                    product_count: row.try_get("product_count")?,
                })
            })
            .collect()
    }

    async fn create_category(&self, new: NewCategory) -> Result<Category, StoreError> {
        let row: CategoryRow = sqlx::query_as(
            "INSERT INTO categories (name, slug, description, image)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, slug, description, image",
        )
        .bind(&new.name)
        .bind(&new.slug)
        .bind(&new.description)
        .bind(&new.image)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "slug already exists"))?;
        Ok(Category::from(row))
    }

    async fn update_category(&self, id: CategoryId, new: NewCategory) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE categories SET name = $2, slug = $3, description = $4, image = $5
             WHERE id = $1",
        )
        .bind(id.as_i32())
        .bind(&new.name)
        .bind(&new.slug)
        .bind(&new.description)
        .bind(&new.image)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "slug already exists"))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_category(&self, id: CategoryId) -> Result<(), StoreError> {
        // products.category_id is ON DELETE SET NULL, so referencing
        // products become uncategorized.
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Cart
    // =========================================================================

    async fn cart_items(&self, user_id: UserId) -> Result<Vec<CartLine>, StoreError> {
        let rows: Vec<CartLineRow> = sqlx::query_as(
            "SELECT p.id AS product_id, p.name, p.price, p.discount_price, p.images,
                    p.stock, p.rating, c.quantity
             FROM cart_items c
             JOIN products p ON p.id = c.product_id
             WHERE c.user_id = $1
             ORDER BY c.id",
        )
        .bind(user_id.as_i32())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(CartLine::from).collect())
    }

    async fn add_to_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO cart_items (user_id, product_id, quantity)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id, product_id)
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .bind(quantity)
        .execute(&self.pool)
        .await
        .map_err(not_found_on_fk)?;
        Ok(())
    }

    async fn set_cart_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), StoreError> {
        let result = if quantity < 1 {
            sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
                .bind(user_id.as_i32())
                .bind(product_id.as_i32())
                .execute(&self.pool)
                .await?
        } else {
            sqlx::query(
                "UPDATE cart_items SET quantity = $3 WHERE user_id = $1 AND product_id = $2",
            )
            .bind(user_id.as_i32())
            .bind(product_id.as_i32())
            .bind(quantity)
            .execute(&self.pool)
            .await?
        };
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn remove_from_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
            .bind(user_id.as_i32())
            .bind(product_id.as_i32())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear_cart(&self, user_id: UserId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    async fn wishlist(&self, user_id: UserId) -> Result<Vec<CartLine>, StoreError> {
        let rows: Vec<CartLineRow> = sqlx::query_as(
            "SELECT p.id AS product_id, p.name, p.price, p.discount_price, p.images,
                    p.stock, p.rating, 1 AS quantity
             FROM wishlist_items w
             JOIN products p ON p.id = w.product_id
             WHERE w.user_id = $1
             ORDER BY w.id",
        )
        .bind(user_id.as_i32())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(CartLine::from).collect())
    }

    async fn add_to_wishlist(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO wishlist_items (user_id, product_id)
             VALUES ($1, $2)
             ON CONFLICT (user_id, product_id) DO NOTHING",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .execute(&self.pool)
        .await
        .map_err(not_found_on_fk)?;
        Ok(())
    }

    async fn remove_from_wishlist(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM wishlist_items WHERE user_id = $1 AND product_id = $2")
            .bind(user_id.as_i32())
            .bind(product_id.as_i32())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    async fn create_order(&self, draft: OrderDraft) -> Result<Order, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row: OrderRow = sqlx::query_as(&format!(
            "INSERT INTO orders (order_number, user_id, customer_name, customer_email,
                 customer_phone, shipping_address, city, notes, status, subtotal,
                 shipping_fee, total)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending', $9, $10, $11)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(&draft.order_number)
        .bind(draft.user_id.as_i32())
        .bind(&draft.customer_name)
        .bind(&draft.customer_email)
        .bind(&draft.customer_phone)
        .bind(&draft.shipping_address)
        .bind(&draft.city)
        .bind(&draft.notes)
        .bind(draft.subtotal)
        .bind(draft.shipping_fee)
        .bind(draft.total)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "order number collision"))?;

        for line in &draft.items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, product_name, product_image,
                     unit_price, quantity)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(row.id)
            .bind(line.product_id.as_i32())
            .bind(&line.product_name)
            .bind(&line.product_image)
            .bind(line.unit_price)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;

            // Conditional decrement: refusing to match a row when stock is
            // short fails the whole order, and dropping the transaction
            // rolls back everything staged so far.
            let updated = sqlx::query(
                "UPDATE products
                 SET stock = stock - $2, sold_count = sold_count + $2
                 WHERE id = $1 AND stock >= $2",
            )
            .bind(line.product_id.as_i32())
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
            if updated.rows_affected() == 0 {
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
                        .bind(line.product_id.as_i32())
                        .fetch_one(&mut *tx)
                        .await?;
                if !exists {
                    return Err(StoreError::NotFound);
                }
                return Err(StoreError::InsufficientStock(line.product_id));
            }
        }

        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(draft.user_id.as_i32())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let items = draft
            .items
            .into_iter()
            .map(|line| OrderLine {
                product_id: line.product_id,
                product_name: line.product_name,
                product_image: line.product_image,
                unit_price: line.unit_price,
                quantity: line.quantity,
            })
            .collect();
        row.into_order(items)
    }

    async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id.as_i32())
        .fetch_all(&self.pool)
        .await?;
        self.attach_items(rows).await
    }

    async fn get_order_for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, StoreError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2"
        ))
        .bind(id.as_i32())
        .bind(user_id.as_i32())
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.attach_items(vec![row]).await?.into_iter().next())
    }

    async fn list_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, StoreError> {
        let rows: Vec<OrderRow> = match status {
            Some(status) => {
                sqlx::query_as(&format!(
                    "SELECT {ORDER_COLUMNS} FROM orders
                     WHERE status = $1 ORDER BY created_at DESC, id DESC"
                ))
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        self.attach_items(rows).await
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.attach_items(vec![row]).await?.into_iter().next())
    }

    async fn set_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
            .bind(id.as_i32())
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    async fn reviews_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Review>, StoreError> {
        let rows: Vec<ReviewRow> = sqlx::query_as(
            "SELECT id, product_id, user_id, user_name, rating, comment, created_at
             FROM reviews WHERE product_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(product_id.as_i32())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn add_review(&self, new: NewReview) -> Result<Review, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row: ReviewRow = sqlx::query_as(
            "INSERT INTO reviews (product_id, user_id, user_name, rating, comment)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, product_id, user_id, user_name, rating, comment, created_at",
        )
        .bind(new.product_id.as_i32())
        .bind(new.user_id.as_i32())
        .bind(&new.user_name)
        .bind(new.rating)
        .bind(&new.comment)
        .fetch_one(&mut *tx)
        .await
        .map_err(not_found_on_fk)?;

        // Insert and aggregate recompute commit together, so two concurrent
        // submissions cannot leave a stale count behind.
        sqlx::query(
            "UPDATE products p
             SET rating = agg.mean, review_count = agg.cnt
             FROM (SELECT ROUND(AVG(rating), 2) AS mean, COUNT(*)::INT AS cnt
                   FROM reviews WHERE product_id = $1) agg
             WHERE p.id = $1",
        )
        .bind(new.product_id.as_i32())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Review::from(row))
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    async fn admin_stats(&self) -> Result<AdminStats, StoreError> {
        let revenue: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total), 0) FROM orders WHERE status <> 'cancelled'",
        )
        .fetch_one(&self.pool)
        .await?;
        let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'user'")
            .fetch_one(&self.pool)
            .await?;
        let products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        let monthly_rows = sqlx::query(
            "SELECT to_char(created_at, 'YYYY-MM') AS month, SUM(total) AS total
             FROM orders
             WHERE created_at >= NOW() - INTERVAL '6 months'
             GROUP BY 1 ORDER BY 1",
        )
        .fetch_all(&self.pool)
        .await?;
        let monthly_revenue = monthly_rows
            .into_iter()
            .map(|row| {
                Ok(MonthlyRevenue {
                    month: row.try_get("month")?,
                    total: row.try_get("total")?,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        let top_rows = sqlx::query(
            "SELECT product_id, MIN(product_name) AS name, SUM(quantity)::BIGINT AS sold
             FROM order_items GROUP BY product_id ORDER BY sold DESC LIMIT 5",
        )
        .fetch_all(&self.pool)
        .await?;
        let top_products = top_rows
            .into_iter()
            .map(|row| {
                Ok(TopProduct {
                    product_id: ProductId::new(row.try_get("product_id")?),
                    name: row.try_get("name")?,
                    sold: row.try_get("sold")?,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        let low_rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE stock < $1 ORDER BY stock LIMIT 10"
        ))
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_all(&self.pool)
        .await?;
        let low_stock_products = low_rows.into_iter().map(Product::from).collect();

        Ok(AdminStats {
            revenue,
            orders,
            users,
            products,
            monthly_revenue,
            top_products,
            low_stock_products,
        })
    }
}
