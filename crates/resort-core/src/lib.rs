//! # resort-core: Pure Menu & Pricing Logic
//!
//! This crate holds every piece of business logic behind the resort's
//! customer menu and staff portal. Nothing in here touches a database,
//! a socket or the file system.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Resort Menu Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Web client / staff portal                      │   │
//! │  │     Menu UI ──► Cart UI ──► Order UI ──► Staff order board      │   │
//! │  └──────────────┬──────────────────────────────┬───────────────────┘   │
//! │                 │ local state                  │ HTTP (JSON)           │
//! │  ┌──────────────▼──────────────┐  ┌────────────▼────────────────────┐  │
//! │  │ resort-client               │  │ menu-api (axum)                 │  │
//! │  │ persisted cart, prefs,      │  │ items, categories, orders       │  │
//! │  │ offline menu cache          │  │                                 │  │
//! │  └──────────────┬──────────────┘  └────────────┬────────────────────┘  │
//! │                 │                              │                        │
//! │  ┌──────────────▼──────────────────────────────▼───────────────────┐   │
//! │  │               ★ resort-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌──────────┐ ┌───────────┐ ┌──────┐ ┌───────────┐ │   │
//! │  │  │  money  │ │ currency │ │ promotion │ │ cart │ │   order   │ │   │
//! │  │  └─────────┘ └──────────┘ └───────────┘ └──────┘ └───────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  resort-db (Menu Data Access)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Menu domain types (MenuItem, Variant, Category, Promotion)
//! - [`money`] - Integer minor-unit money
//! - [`currency`] - Currency conversion and locale-aware price formatting
//! - [`promotion`] - Promotion resolver (best discount per item)
//! - [`cart`] - Cart aggregator
//! - [`menu`] - Search, filtering and grouping of menu items
//! - [`order`] - Order records, totals and status transitions
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use resort_core::currency::{format_price, Currency, ExchangeRate, Locale};
//! use resort_core::money::Money;
//!
//! let rate = ExchangeRate::new(90_000).unwrap();
//! let shown = format_price(
//!     Money::from_minor(600),
//!     Currency::Lbp,
//!     Currency::Usd,
//!     rate,
//!     Locale::En,
//! );
//! assert_eq!(shown, "540,000 L.L.");
//! ```

pub mod cart;
pub mod currency;
pub mod error;
pub mod menu;
pub mod money;
pub mod order;
pub mod promotion;
pub mod types;
pub mod validation;

// Flat re-exports so callers can `use resort_core::Money`.
pub use cart::{Cart, CartItem, CartTotals};
pub use currency::{format_price, Currency, DisplaySettings, ExchangeRate, Locale};
pub use error::{CoreError, CoreResult, ValidationError};
pub use menu::MenuSection;
pub use money::Money;
pub use order::{
    NewOrder, Order, OrderItem, OrderLine, OrderPricing, OrderStatus, OrderTotals, PaymentStatus,
};
pub use promotion::{resolve_price, PriceResolution};
pub use types::*;

/// Maximum distinct entries allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single cart entry.
///
/// Guards against fat-finger orders (typing 100 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 99;
