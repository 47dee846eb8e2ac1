//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use summit_core::{Role, UserId};

/// A registered user (domain type).
///
/// The credential hash is deliberately not part of this type; it only
/// travels through [`crate::store::Store::get_user_password_hash`] and the
/// auth service.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address (unique).
    pub email: String,
    /// Optional contact phone.
    pub phone: Option<String>,
    /// Optional default shipping address.
    pub address: Option<String>,
    /// Account role.
    pub role: Role,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
