//! # resort-client: Guest-Device State
//!
//! Persistence for the pieces of the menu experience that live on the
//! guest's phone: the cart, the display preferences and an offline copy of
//! the menu. All business rules come from `resort-core`; this crate only
//! decides where values are kept and what happens when they are missing or
//! corrupt.
//!
//! ## Modules
//!
//! - [`storage`] - `KeyValueStore` trait with memory and file backends
//! - [`cart`] - Cart with write-through persistence
//! - [`preferences`] - Currency, language and exchange rate
//! - [`offline`] - Offline menu snapshot with a freshness window
//! - [`config`] - `client.toml` plus `RESORT_*` overrides
//! - [`error`] - Client error types
//!
//! ## Example Usage
//!
//! ```rust
//! use resort_client::{MemoryStore, PersistentCart};
//! use resort_core::{MenuItem, Money};
//!
//! let store = MemoryStore::new();
//! let mut cart = PersistentCart::load(store.clone());
//! cart.add_item(&MenuItem::new("1", "Tabbouleh", Money::from_minor(450)), 2, None)
//!     .unwrap();
//!
//! // A reload sees the same cart.
//! let again = PersistentCart::load(store);
//! assert_eq!(again.total_price(), Money::from_minor(900));
//! ```

pub mod cart;
pub mod config;
pub mod error;
pub mod offline;
pub mod preferences;
pub mod storage;

pub use cart::PersistentCart;
pub use config::{ClientConfig, DisplayDefaults};
pub use error::{ClientError, ClientResult, StorageError, StorageResult};
pub use offline::{MenuSnapshot, OfflineMenuCache};
pub use preferences::Preferences;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
