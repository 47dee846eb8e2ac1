//! Domain types shared across routes, services, and storage adapters.
//!
//! These are validated domain objects; storage adapters map their own row
//! representations into them so route handlers never see raw rows.

pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod review;
pub mod stats;
pub mod user;

pub use cart::CartLine;
pub use category::{Category, CategoryWithCount};
pub use order::{NewOrderLine, Order, OrderDraft, OrderLine};
pub use product::{Product, ProductSummary};
pub use review::Review;
pub use stats::{AdminStats, MonthlyRevenue, TopProduct};
pub use user::User;
