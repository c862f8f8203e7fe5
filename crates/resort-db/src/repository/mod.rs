//! # Repository Module
//!
//! One repository per table group. Each holds a pool clone and exposes
//! async methods that speak domain types from `resort-core`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  handler                                                               │
//! │     │  db.menu_items().list_by_category("mezze")                        │
//! │     ▼                                                                   │
//! │  MenuItemRepository ── SQL ──► SQLite                                   │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  MenuItemRow (flat, JSON text columns) ──TryFrom──► MenuItem            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CategoryRepository`] - Menu sections
//! - [`MenuItemRepository`] - Dishes and drinks
//! - [`PromotionRepository`] - Promotion catalog
//! - [`OrderRepository`] - Orders and their lines

pub mod category;
pub mod menu_item;
pub mod order;
pub mod promotion;

pub use category::CategoryRepository;
pub use menu_item::MenuItemRepository;
pub use order::{OrderRepository, Transition};
pub use promotion::PromotionRepository;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DbError, DbResult};

/// Encodes a list or set for a JSON text column.
pub(crate) fn to_json_column<T: Serialize>(column: &'static str, value: &T) -> DbResult<String> {
    serde_json::to_string(value).map_err(|e| DbError::malformed(column, e))
}

/// Decodes a JSON text column.
pub(crate) fn from_json_column<T: DeserializeOwned>(column: &'static str, raw: &str) -> DbResult<T> {
    serde_json::from_str(raw).map_err(|e| DbError::malformed(column, e))
}
