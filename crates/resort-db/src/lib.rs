//! # resort-db: Menu Data Access
//!
//! SQLite persistence for the menu, the promotion catalog and orders.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  menu-api handler (GET /api/menu/items)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   resort-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │  ┌──────────────┐   ┌─────────────────┐   ┌──────────────────┐  │   │
//! │  │  │  Database    │   │  Repositories   │   │  Migrations      │  │   │
//! │  │  │  (pool.rs)   │◄──│  category       │   │  (embedded)      │  │   │
//! │  │  │  SqlitePool  │   │  menu_item      │   │  001_initial.sql │  │   │
//! │  │  │              │   │  promotion      │   └──────────────────┘  │   │
//! │  │  │              │   │  order          │                         │   │
//! │  │  └──────┬───────┘   └─────────────────┘                         │   │
//! │  │         │                                                       │   │
//! │  │  ┌──────▼───────┐                                               │   │
//! │  │  │  Catalog     │  Listing<T> { data, error } for menu reads    │   │
//! │  │  └──────────────┘                                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (DATABASE_PATH)                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use resort_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./resort.db")).await?;
//!
//! let listing = db.catalog().menu_items().await;
//! if let Some(err) = &listing.error {
//!     tracing::warn!(%err, "menu unavailable");
//! }
//! ```

pub mod catalog;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use catalog::{Catalog, Listing};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::{
    CategoryRepository, MenuItemRepository, OrderRepository, PromotionRepository, Transition,
};
