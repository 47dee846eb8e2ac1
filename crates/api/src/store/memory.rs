//! In-memory document-style storage adapter.
//!
//! Keeps every collection in a map behind a single `RwLock`. Write
//! operations take the write lock, so multi-entity units of work
//! (`create_order`, `add_review`) are atomic without any further
//! coordination. Used as the `STORE_BACKEND=memory` runtime backend and as
//! the storage backend for tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

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

#[derive(Debug, Clone)]
struct UserDoc {
    user: User,
    password_hash: String,
}

#[derive(Default)]
struct Collections {
    users: BTreeMap<UserId, UserDoc>,
    products: BTreeMap<ProductId, Product>,
    categories: BTreeMap<CategoryId, Category>,
    carts: HashMap<UserId, BTreeMap<ProductId, i32>>,
    wishlists: HashMap<UserId, BTreeSet<ProductId>>,
    orders: BTreeMap<OrderId, Order>,
    reviews: BTreeMap<ReviewId, Review>,
    next_id: i32,
}

impl Collections {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn resolve_category_slug(&self, slug: &str) -> Option<CategoryId> {
        self.categories
            .values()
            .find(|c| c.slug == slug)
            .map(|c| c.id)
    }

    fn matches(&self, product: &Product, filter: &ProductFilter) -> bool {
        // An unknown category slug drops the constraint rather than
        // returning an empty page, mirroring the relational adapter.
        if let Some(slug) = &filter.category_slug
            && let Some(category_id) = self.resolve_category_slug(slug)
            && product.category_id != Some(category_id)
        {
            return false;
        }
        if let Some(brand) = &filter.brand
            && product.brand.as_deref() != Some(brand.as_str())
        {
            return false;
        }
        if let Some(min) = filter.min_price
            && product.price < min
        {
            return false;
        }
        if let Some(max) = filter.max_price
            && product.price > max
        {
            return false;
        }
        if let Some(min_rating) = filter.min_rating
            && product.rating < min_rating
        {
            return false;
        }
        if filter.in_stock && product.stock <= 0 {
            return false;
        }
        if let Some(search) = &filter.search {
            let needle = search.to_lowercase();
            let name_hit = product.name.to_lowercase().contains(&needle);
            let brand_hit = product
                .brand
                .as_deref()
                .is_some_and(|b| b.to_lowercase().contains(&needle));
            if !name_hit && !brand_hit {
                return false;
            }
        }
        true
    }

    fn cart_line(&self, product_id: ProductId, quantity: i32) -> Option<CartLine> {
        self.products.get(&product_id).map(|p| CartLine {
            product_id,
            name: p.name.clone(),
            price: p.price,
            discount_price: p.discount_price,
            images: p.images.clone(),
            stock: p.stock,
            rating: p.rating,
            quantity,
        })
    }
}

/// Document-style storage adapter backed by in-process maps.
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(Collections::default()),
        }
    }

    /// Grant the admin role to the account with the given email. Memory
    /// counterpart of `summit-cli admin promote`; returns false when no
    /// account matches.
    pub async fn promote_to_admin(&self, email: &str) -> bool {
        let mut store = self.collections.write().await;
        match store
            .users
            .values_mut()
            .find(|doc| doc.user.email.eq_ignore_ascii_case(email))
        {
            Some(doc) => {
                doc.user.role = Role::Admin;
                true
            }
            None => false,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_products(products: &mut [Product], sort: ProductSort) {
    match sort {
        ProductSort::Newest => {
            products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        }
        ProductSort::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
        ProductSort::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
        ProductSort::Popular => products.sort_by(|a, b| b.sold_count.cmp(&a.sold_count)),
        ProductSort::Rating => products.sort_by(|a, b| b.rating.cmp(&a.rating)),
    }
}

fn newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    // =========================================================================
    // Users
    // =========================================================================

    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut store = self.collections.write().await;
        if store
            .users
            .values()
            .any(|doc| doc.user.email.eq_ignore_ascii_case(&new.email))
        {
            return Err(StoreError::Conflict("email already registered".to_owned()));
        }
        let id = UserId::new(store.next_id());
        let user = User {
            id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            address: None,
            role: Role::User,
            created_at: Utc::now(),
        };
        store.users.insert(
            id,
            UserDoc {
                user: user.clone(),
                password_hash: new.password_hash,
            },
        );
        Ok(user)
    }

    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, StoreError> {
        let store = self.collections.read().await;
        Ok(store
            .users
            .values()
            .find(|doc| doc.user.email.eq_ignore_ascii_case(email))
            .map(|doc| (doc.user.clone(), doc.password_hash.clone())))
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let store = self.collections.read().await;
        Ok(store.users.get(&id).map(|doc| doc.user.clone()))
    }

    async fn get_user_password_hash(&self, id: UserId) -> Result<String, StoreError> {
        let store = self.collections.read().await;
        store
            .users
            .get(&id)
            .map(|doc| doc.password_hash.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn update_profile(&self, id: UserId, update: ProfileUpdate) -> Result<(), StoreError> {
        let mut store = self.collections.write().await;
        let doc = store.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        doc.user.name = update.name;
        doc.user.phone = update.phone;
        doc.user.address = update.address;
        Ok(())
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), StoreError> {
        let mut store = self.collections.write().await;
        let doc = store.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        doc.password_hash = password_hash.to_owned();
        Ok(())
    }

    async fn list_customers(&self) -> Result<Vec<User>, StoreError> {
        let store = self.collections.read().await;
        let mut customers: Vec<User> = store
            .users
            .values()
            .filter(|doc| doc.user.role == Role::User)
            .map(|doc| doc.user.clone())
            .collect();
        customers.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(customers)
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
        let store = self.collections.read().await;
        let mut matched: Vec<Product> = store
            .products
            .values()
            .filter(|p| store.matches(p, filter))
            .cloned()
            .collect();
        let total = matched.len() as i64;
        sort_products(&mut matched, sort);

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let products: Vec<Product> = matched
            .into_iter()
            .skip(offset)
            .take(page.limit as usize)
            .collect();
        let pages = (total + i64::from(page.limit) - 1) / i64::from(page.limit);
        Ok(ProductListing {
            products,
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
        let store = self.collections.read().await;
        let needle = query.to_lowercase();
        Ok(store
            .products
            .values()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.brand
                        .as_deref()
                        .is_some_and(|b| b.to_lowercase().contains(&needle))
            })
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .map(ProductSummary::from)
            .collect())
    }

    async fn featured_buckets(&self, limit: i64) -> Result<FeaturedBuckets, StoreError> {
        let store = self.collections.read().await;
        let cap = usize::try_from(limit).unwrap_or(usize::MAX);
        let bucket = |pred: fn(&&Product) -> bool| -> Vec<Product> {
            store.products.values().filter(pred).take(cap).cloned().collect()
        };
        Ok(FeaturedBuckets {
            featured: bucket(|p| p.is_featured),
            trending: bucket(|p| p.is_trending),
            new_arrivals: bucket(|p| p.is_new_arrival),
            best_sellers: bucket(|p| p.is_best_seller),
        })
    }

    async fn brands(&self) -> Result<Vec<String>, StoreError> {
        let store = self.collections.read().await;
        let mut brands: Vec<String> = store
            .products
            .values()
            .filter_map(|p| p.brand.clone())
            .filter(|b| !b.is_empty())
            .collect();
        brands.sort();
        brands.dedup();
        Ok(brands)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let store = self.collections.read().await;
        Ok(store.products.get(&id).cloned())
    }

    async fn related_products(
        &self,
        id: ProductId,
        limit: i64,
    ) -> Result<Vec<Product>, StoreError> {
        let store = self.collections.read().await;
        let Some(product) = store.products.get(&id) else {
            return Ok(Vec::new());
        };
        Ok(store
            .products
            .values()
            .filter(|p| p.id != id && p.category_id == product.category_id)
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn create_product(&self, new: NewProduct) -> Result<Product, StoreError> {
        let mut store = self.collections.write().await;
        if store.products.values().any(|p| p.slug == new.slug) {
            return Err(StoreError::Conflict("slug already exists".to_owned()));
        }
        let id = ProductId::new(store.next_id());
        let product = Product {
            id,
            name: new.name,
            slug: new.slug,
            description: new.description,
            specifications: new.specifications,
            brand: new.brand,
            price: new.price,
            discount_price: new.discount_price,
            stock: new.stock,
            rating: Decimal::ZERO,
            review_count: 0,
            sold_count: 0,
            category_id: new.category_id,
            images: new.images,
            is_featured: new.is_featured,
            is_trending: new.is_trending,
            is_new_arrival: new.is_new_arrival,
            is_best_seller: new.is_best_seller,
            created_at: Utc::now(),
        };
        store.products.insert(id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<(), StoreError> {
        let mut store = self.collections.write().await;
        let product = store.products.get_mut(&id).ok_or(StoreError::NotFound)?;
        product.name = update.name;
        product.description = update.description;
        product.specifications = update.specifications;
        product.brand = update.brand;
        product.price = update.price;
        product.discount_price = update.discount_price;
        product.stock = update.stock;
        product.category_id = update.category_id;
        product.images = update.images;
        product.is_featured = update.is_featured;
        product.is_trending = update.is_trending;
        product.is_new_arrival = update.is_new_arrival;
        product.is_best_seller = update.is_best_seller;
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        let mut store = self.collections.write().await;
        store.products.remove(&id);
        Ok(())
    }

    async fn admin_list_products(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<Product>, StoreError> {
        let store = self.collections.read().await;
        let needle = search.map(str::to_lowercase);
        let mut products: Vec<Product> = store
            .products
            .values()
            .filter(|p| {
                needle.as_deref().is_none_or(|q| {
                    p.name.to_lowercase().contains(q)
                        || p.brand.as_deref().is_some_and(|b| b.to_lowercase().contains(q))
                })
            })
            .cloned()
            .collect();
        sort_products(&mut products, ProductSort::Newest);
        Ok(products)
    }

    // =========================================================================
    // Categories
    // =========================================================================

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let store = self.collections.read().await;
        let mut categories: Vec<Category> = store.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn list_categories_with_counts(&self) -> Result<Vec<CategoryWithCount>, StoreError> {
        let store = self.collections.read().await;
        let mut categories: Vec<CategoryWithCount> = store
            .categories
            .values()
            .map(|c| CategoryWithCount {
                category: c.clone(),
                product_count: store
                    .products
                    .values()
                    .filter(|p| p.category_id == Some(c.id))
                    .count() as i64,
            })
            .collect();
        categories.sort_by(|a, b| a.category.name.cmp(&b.category.name));
        Ok(categories)
    }

    async fn create_category(&self, new: NewCategory) -> Result<Category, StoreError> {
        let mut store = self.collections.write().await;
        if store.categories.values().any(|c| c.slug == new.slug) {
            return Err(StoreError::Conflict("slug already exists".to_owned()));
        }
        let id = CategoryId::new(store.next_id());
        let category = Category {
            id,
            name: new.name,
            slug: new.slug,
            description: new.description,
            image: new.image,
        };
        store.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: CategoryId, new: NewCategory) -> Result<(), StoreError> {
        let mut store = self.collections.write().await;
        let category = store.categories.get_mut(&id).ok_or(StoreError::NotFound)?;
        category.name = new.name;
        category.slug = new.slug;
        category.description = new.description;
        category.image = new.image;
        Ok(())
    }

    async fn delete_category(&self, id: CategoryId) -> Result<(), StoreError> {
        let mut store = self.collections.write().await;
        store.categories.remove(&id);
        for product in store.products.values_mut() {
            if product.category_id == Some(id) {
                product.category_id = None;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Cart
    // =========================================================================

    async fn cart_items(&self, user_id: UserId) -> Result<Vec<CartLine>, StoreError> {
        let store = self.collections.read().await;
        let Some(cart) = store.carts.get(&user_id) else {
            return Ok(Vec::new());
        };
        Ok(cart
            .iter()
            .filter_map(|(&product_id, &quantity)| store.cart_line(product_id, quantity))
            .collect())
    }

    async fn add_to_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), StoreError> {
        let mut store = self.collections.write().await;
        if !store.products.contains_key(&product_id) {
            return Err(StoreError::NotFound);
        }
        let cart = store.carts.entry(user_id).or_default();
        *cart.entry(product_id).or_insert(0) += quantity;
        Ok(())
    }

    async fn set_cart_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), StoreError> {
        let mut store = self.collections.write().await;
        let cart = store.carts.entry(user_id).or_default();
        if !cart.contains_key(&product_id) {
            return Err(StoreError::NotFound);
        }
        if quantity < 1 {
            cart.remove(&product_id);
        } else {
            cart.insert(product_id, quantity);
        }
        Ok(())
    }

    async fn remove_from_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), StoreError> {
        let mut store = self.collections.write().await;
        if let Some(cart) = store.carts.get_mut(&user_id) {
            cart.remove(&product_id);
        }
        Ok(())
    }

    async fn clear_cart(&self, user_id: UserId) -> Result<(), StoreError> {
        let mut store = self.collections.write().await;
        store.carts.remove(&user_id);
        Ok(())
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    async fn wishlist(&self, user_id: UserId) -> Result<Vec<CartLine>, StoreError> {
        let store = self.collections.read().await;
        let Some(wishlist) = store.wishlists.get(&user_id) else {
            return Ok(Vec::new());
        };
        Ok(wishlist
            .iter()
            .filter_map(|&product_id| store.cart_line(product_id, 1))
            .collect())
    }

    async fn add_to_wishlist(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), StoreError> {
        let mut store = self.collections.write().await;
        if !store.products.contains_key(&product_id) {
            return Err(StoreError::NotFound);
        }
        store.wishlists.entry(user_id).or_default().insert(product_id);
        Ok(())
    }

    async fn remove_from_wishlist(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), StoreError> {
        let mut store = self.collections.write().await;
        if let Some(wishlist) = store.wishlists.get_mut(&user_id) {
            wishlist.remove(&product_id);
        }
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    async fn create_order(&self, draft: OrderDraft) -> Result<Order, StoreError> {
        let mut store = self.collections.write().await;

        if store
            .orders
            .values()
            .any(|o| o.order_number == draft.order_number)
        {
            return Err(StoreError::Conflict("order number collision".to_owned()));
        }

        // Validate every line before touching anything so a failure leaves
        // the store untouched (all-or-nothing).
        for line in &draft.items {
            let product = store
                .products
                .get(&line.product_id)
                .ok_or(StoreError::NotFound)?;
            if product.stock < line.quantity {
                return Err(StoreError::InsufficientStock(line.product_id));
            }
        }

        for line in &draft.items {
            // Presence checked above.
            if let Some(product) = store.products.get_mut(&line.product_id) {
                product.stock -= line.quantity;
                product.sold_count += line.quantity;
            }
        }

        let id = OrderId::new(store.next_id());
        let order = Order {
            id,
            order_number: draft.order_number,
            user_id: draft.user_id,
            customer_name: draft.customer_name,
            customer_email: draft.customer_email,
            customer_phone: draft.customer_phone,
            shipping_address: draft.shipping_address,
            city: draft.city,
            notes: draft.notes,
            status: OrderStatus::Pending,
            subtotal: draft.subtotal,
            shipping_fee: draft.shipping_fee,
            total: draft.total,
            items: draft
                .items
                .into_iter()
                .map(|line| OrderLine {
                    product_id: line.product_id,
                    product_name: line.product_name,
                    product_image: line.product_image,
                    unit_price: line.unit_price,
                    quantity: line.quantity,
                })
                .collect(),
            created_at: Utc::now(),
        };
        store.orders.insert(id, order.clone());
        store.carts.remove(&order.user_id);
        Ok(order)
    }

    async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError> {
        let store = self.collections.read().await;
        let mut orders: Vec<Order> = store
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut orders);
        Ok(orders)
    }

    async fn get_order_for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, StoreError> {
        let store = self.collections.read().await;
        Ok(store
            .orders
            .get(&id)
            .filter(|o| o.user_id == user_id)
            .cloned())
    }

    async fn list_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, StoreError> {
        let store = self.collections.read().await;
        let mut orders: Vec<Order> = store
            .orders
            .values()
            .filter(|o| status.is_none_or(|s| o.status == s))
            .cloned()
            .collect();
        newest_first(&mut orders);
        Ok(orders)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let store = self.collections.read().await;
        Ok(store.orders.get(&id).cloned())
    }

    async fn set_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), StoreError> {
        let mut store = self.collections.write().await;
        let order = store.orders.get_mut(&id).ok_or(StoreError::NotFound)?;
        order.status = status;
        Ok(())
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    async fn reviews_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Review>, StoreError> {
        let store = self.collections.read().await;
        let mut reviews: Vec<Review> = store
            .reviews
            .values()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(reviews)
    }

    async fn add_review(&self, new: NewReview) -> Result<Review, StoreError> {
        let mut store = self.collections.write().await;
        if !store.products.contains_key(&new.product_id) {
            return Err(StoreError::NotFound);
        }
        let id = ReviewId::new(store.next_id());
        let review = Review {
            id,
            product_id: new.product_id,
            user_id: new.user_id,
            user_name: new.user_name,
            rating: new.rating,
            comment: new.comment,
            created_at: Utc::now(),
        };
        store.reviews.insert(id, review.clone());

        // Recompute the aggregate inside the same write lock as the insert.
        let (sum, count) = store
            .reviews
            .values()
            .filter(|r| r.product_id == new.product_id)
            .fold((0_i64, 0_i64), |(sum, count), r| {
                (sum + i64::from(r.rating), count + 1)
            });
        let mean = (Decimal::from(sum) / Decimal::from(count)).round_dp(2);
        if let Some(product) = store.products.get_mut(&new.product_id) {
            product.rating = mean;
            product.review_count = i32::try_from(count).unwrap_or(i32::MAX);
        }
        Ok(review)
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    async fn admin_stats(&self) -> Result<AdminStats, StoreError> {
        let store = self.collections.read().await;

        let revenue = store
            .orders
            .values()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .map(|o| o.total)
            .sum();
        let orders = store.orders.len() as i64;
        let users = store
            .users
            .values()
            .filter(|doc| doc.user.role == Role::User)
            .count() as i64;
        let products = store.products.len() as i64;

        let cutoff = Utc::now() - chrono::Months::new(6);
        let mut by_month: BTreeMap<String, Decimal> = BTreeMap::new();
        for order in store.orders.values().filter(|o| o.created_at >= cutoff) {
            let month = order.created_at.format("%Y-%m").to_string();
            *by_month.entry(month).or_insert(Decimal::ZERO) += order.total;
        }
        let monthly_revenue = by_month
            .into_iter()
            .map(|(month, total)| MonthlyRevenue { month, total })
            .collect();

        let mut sold: HashMap<ProductId, (String, i64)> = HashMap::new();
        for order in store.orders.values() {
            for line in &order.items {
                let entry = sold
                    .entry(line.product_id)
                    .or_insert_with(|| (line.product_name.clone(), 0));
                entry.1 += i64::from(line.quantity);
            }
        }
        let mut top_products: Vec<TopProduct> = sold
            .into_iter()
            .map(|(product_id, (name, sold))| TopProduct {
                product_id,
                name,
                sold,
            })
            .collect();
        top_products.sort_by(|a, b| b.sold.cmp(&a.sold));
        top_products.truncate(5);

        let low_stock_products: Vec<Product> = store
            .products
            .values()
            .filter(|p| p.stock < LOW_STOCK_THRESHOLD)
            .take(10)
            .cloned()
            .collect();

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
