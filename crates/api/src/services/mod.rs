//! Business logic services.
//!
//! Services sit between route handlers and the storage adapter: handlers
//! parse and authenticate, services decide, the store persists.

pub mod auth;
pub mod orders;
pub mod uploads;
