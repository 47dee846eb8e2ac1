//! Seed the database with sample catalog data.
//!
//! Creates a handful of categories and products plus a default admin
//! account (`admin@summitgear.dev`), so a fresh environment has something
//! to browse. Seeding goes through the same storage adapter as the API,
//! so derived fields and slugs come out exactly as production writes
//! would produce them.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use summit_api::services::auth::hash_password;
use summit_api::store::postgres::PgStore;
use summit_api::store::{NewCategory, NewProduct, NewUser, Store};
use summit_core::{CategoryId, slugify};

use super::CliError;

const ADMIN_EMAIL: &str = "admin@summitgear.dev";

struct SeedProduct {
    name: &'static str,
    brand: &'static str,
    category: &'static str,
    price: Decimal,
    discount_price: Option<Decimal>,
    stock: i32,
    featured: bool,
    trending: bool,
    new_arrival: bool,
    best_seller: bool,
}

const CATEGORIES: &[(&str, &str)] = &[
    ("Running", "Shoes, apparel, and accessories for road and trail"),
    ("Cycling", "Bikes, helmets, and riding gear"),
    ("Camping & Hiking", "Tents, packs, and everything for the backcountry"),
    ("Fitness", "Strength and conditioning equipment for home and gym"),
    ("Team Sports", "Balls, protective gear, and training equipment"),
    ("Water Sports", "Gear for swimming, paddling, and open water"),
];

fn products() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            name: "Ridgeline Trail Runner",
            brand: "Cairn",
            category: "Running",
            price: dec!(139.95),
            discount_price: Some(dec!(119.95)),
            stock: 42,
            featured: true,
            trending: false,
            new_arrival: true,
            best_seller: false,
        },
        SeedProduct {
            name: "Tempo Road Shoe",
            brand: "Cairn",
            category: "Running",
            price: dec!(159.00),
            discount_price: None,
            stock: 30,
            featured: false,
            trending: true,
            new_arrival: false,
            best_seller: true,
        },
        SeedProduct {
            name: "Switchback 2 Tent",
            brand: "Basecamp",
            category: "Camping & Hiking",
            price: dec!(289.00),
            discount_price: None,
            stock: 18,
            featured: true,
            trending: false,
            new_arrival: false,
            best_seller: true,
        },
        SeedProduct {
            name: "Talus 45 Backpack",
            brand: "Basecamp",
            category: "Camping & Hiking",
            price: dec!(179.50),
            discount_price: Some(dec!(149.50)),
            stock: 25,
            featured: false,
            trending: true,
            new_arrival: true,
            best_seller: false,
        },
        SeedProduct {
            name: "Gravel Pro Helmet",
            brand: "Velodyne",
            category: "Cycling",
            price: dec!(124.00),
            discount_price: None,
            stock: 56,
            featured: false,
            trending: false,
            new_arrival: true,
            best_seller: false,
        },
        SeedProduct {
            name: "Crankset Bib Shorts",
            brand: "Velodyne",
            category: "Cycling",
            price: dec!(98.00),
            discount_price: None,
            stock: 64,
            featured: false,
            trending: false,
            new_arrival: false,
            best_seller: false,
        },
        SeedProduct {
            name: "Forge Adjustable Dumbbells",
            brand: "Ironworks",
            category: "Fitness",
            price: dec!(349.00),
            discount_price: Some(dec!(299.00)),
            stock: 12,
            featured: true,
            trending: true,
            new_arrival: false,
            best_seller: true,
        },
        SeedProduct {
            name: "Circuit Resistance Band Set",
            brand: "Ironworks",
            category: "Fitness",
            price: dec!(34.95),
            discount_price: None,
            stock: 120,
            featured: false,
            trending: false,
            new_arrival: false,
            best_seller: true,
        },
        SeedProduct {
            name: "Matchday Size 5 Ball",
            brand: "Pitchside",
            category: "Team Sports",
            price: dec!(29.99),
            discount_price: None,
            stock: 200,
            featured: false,
            trending: false,
            new_arrival: false,
            best_seller: false,
        },
        SeedProduct {
            name: "Openwater Swim Goggles",
            brand: "Bluefin",
            category: "Water Sports",
            price: dec!(42.00),
            discount_price: None,
            stock: 80,
            featured: false,
            trending: false,
            new_arrival: true,
            best_seller: false,
        },
    ]
}

/// Seed categories, products, and the default admin account.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or an insert fails
/// (for example when the seed has already been applied and slugs collide).
pub async fn run(admin_password: &str) -> Result<(), CliError> {
    let pool = super::connect().await?;
    let store = PgStore::new(pool);

    tracing::info!("Seeding categories...");
    let mut category_ids: Vec<(&str, CategoryId)> = Vec::new();
    for (name, description) in CATEGORIES {
        let category = store
            .create_category(NewCategory {
                name: (*name).to_string(),
                slug: slugify(name),
                description: Some((*description).to_string()),
                image: None,
            })
            .await?;
        category_ids.push((name, category.id));
    }

    tracing::info!("Seeding products...");
    for seed in products() {
        let category_id = category_ids
            .iter()
            .find(|(name, _)| *name == seed.category)
            .map(|(_, id)| *id);
        store
            .create_product(NewProduct {
                name: seed.name.to_string(),
                slug: slugify(seed.name),
                description: Some(format!("{} by {}.", seed.name, seed.brand)),
                specifications: None,
                brand: Some(seed.brand.to_string()),
                price: seed.price,
                discount_price: seed.discount_price,
                stock: seed.stock,
                category_id,
                images: Vec::new(),
                is_featured: seed.featured,
                is_trending: seed.trending,
                is_new_arrival: seed.new_arrival,
                is_best_seller: seed.best_seller,
            })
            .await?;
    }

    tracing::info!("Creating admin account...");
    let password_hash = hash_password(admin_password)?;
    store
        .create_user(NewUser {
            name: "Summit Admin".to_string(),
            email: ADMIN_EMAIL.to_string(),
            password_hash,
            phone: None,
        })
        .await?;
    super::admin::promote_on(store.pool(), ADMIN_EMAIL).await?;

    tracing::info!("Seed complete");
    Ok(())
}
