//! Summit Gear Core - Shared types library.
//!
//! This crate provides common types used across all Summit Gear components:
//! - `api` - REST backend serving the storefront and the admin back office
//! - `cli` - Command-line tools for migrations, seeding, and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, order status, user roles, and slug helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
