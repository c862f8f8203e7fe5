//! # Persistent Cart
//!
//! The guest's cart, written through to the store after every change.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  page load ──► PersistentCart::load(store)                              │
//! │                   │                                                     │
//! │                   ├── "cart" missing    → empty cart                    │
//! │                   ├── "cart" malformed  → empty cart (logged)           │
//! │                   └── "cart" ok         → restored entries              │
//! │                                                                         │
//! │  add / remove / update / clear                                          │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  resort_core::Cart (rules) ──► save "cart" (whole value)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A rejected mutation (too many items, quantity over the cap) leaves both
//! the in-memory cart and the stored value untouched.

use tracing::{debug, warn};

use crate::error::ClientResult;
use crate::storage::{keys, load_json, save_json, KeyValueStore};
use resort_core::{Cart, CartItem, CartTotals, MenuItem, Money, Variant};

/// Cart aggregator with write-through persistence.
#[derive(Debug)]
pub struct PersistentCart<S> {
    store: S,
    cart: Cart,
}

impl<S: KeyValueStore> PersistentCart<S> {
    /// Restores the cart saved in `store`, or starts empty.
    pub fn load(store: S) -> Self {
        let cart = match load_json::<S, Vec<CartItem>>(&store, keys::CART) {
            Ok(Some(items)) => Cart::from_items(items),
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(error = %e, "Could not read saved cart, starting empty");
                Cart::new()
            }
        };

        debug!(entries = cart.entry_count(), "Cart loaded");
        PersistentCart { store, cart }
    }

    fn persist(&self) -> ClientResult<()> {
        save_json(&self.store, keys::CART, self.cart.items())?;
        Ok(())
    }

    pub fn add_item(
        &mut self,
        item: &MenuItem,
        quantity: i64,
        variant: Option<&Variant>,
    ) -> ClientResult<()> {
        self.cart.add_item(item, quantity, variant)?;
        self.persist()
    }

    /// Removes an entry. Absent entries are a no-op and skip the write.
    pub fn remove_item(&mut self, item_id: &str, variant: Option<&Variant>) -> ClientResult<()> {
        if self.cart.remove_item(item_id, variant) {
            self.persist()?;
        }
        Ok(())
    }

    /// Sets a quantity; zero or less removes the entry.
    pub fn update_quantity(
        &mut self,
        item_id: &str,
        quantity: i64,
        variant: Option<&Variant>,
    ) -> ClientResult<()> {
        self.cart.update_quantity(item_id, quantity, variant)?;
        self.persist()
    }

    pub fn clear(&mut self) -> ClientResult<()> {
        self.cart.clear();
        self.persist()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn items(&self) -> &[CartItem] {
        self.cart.items()
    }

    pub fn total_items(&self) -> i64 {
        self.cart.total_items()
    }

    pub fn total_price(&self) -> Money {
        self.cart.total_price()
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(&self.cart)
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Releases the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::storage::{FileStore, MemoryStore};
    use resort_core::{CoreError, MAX_ITEM_QUANTITY};

    fn dish(id: &str, price: i64) -> MenuItem {
        MenuItem::new(id, format!("Dish {id}"), Money::from_minor(price))
    }

    #[test]
    fn test_empty_store_gives_empty_cart() {
        let cart = PersistentCart::load(MemoryStore::new());
        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Money::zero());
    }

    #[test]
    fn test_mutations_are_written_through() {
        let store = MemoryStore::new();
        let mut cart = PersistentCart::load(store.clone());
        let glass = Variant::new("Glass", Money::from_minor(700));

        cart.add_item(&dish("wine", 900), 2, Some(&glass)).unwrap();
        cart.add_item(&dish("hummus", 550), 1, None).unwrap();

        let restored = PersistentCart::load(store.clone());
        assert_eq!(restored.cart(), cart.cart());
        assert_eq!(restored.total_price().minor(), 700 * 2 + 550);

        cart.update_quantity("hummus", 0, None).unwrap();
        let restored = PersistentCart::load(store);
        assert_eq!(restored.totals().entry_count, 1);
    }

    #[test]
    fn test_malformed_saved_cart_starts_empty() {
        let store = MemoryStore::new();
        store.set(keys::CART, "{ not a cart").unwrap();

        let cart = PersistentCart::load(store);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_rejected_add_leaves_storage_untouched() {
        let store = MemoryStore::new();
        let mut cart = PersistentCart::load(store.clone());
        let item = dish("a", 100);

        cart.add_item(&item, MAX_ITEM_QUANTITY, None).unwrap();
        let before = store.get(keys::CART).unwrap();

        let err = cart.add_item(&item, 1, None).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Core(CoreError::QuantityTooLarge { .. })
        ));
        assert_eq!(store.get(keys::CART).unwrap(), before);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = PersistentCart::load(MemoryStore::new());
        cart.add_item(&dish("a", 100), 1, None).unwrap();

        cart.remove_item("a", None).unwrap();
        cart.remove_item("a", None).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_file_backed_cart_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut cart = PersistentCart::load(FileStore::open(dir.path()).unwrap());
            cart.add_item(&dish("knefeh", 600), 3, None).unwrap();
        }

        let cart = PersistentCart::load(FileStore::open(dir.path()).unwrap());
        assert_eq!(cart.total_items(), 3);

        let mut cart = cart;
        cart.clear().unwrap();
        let cart = PersistentCart::load(cart.into_store());
        assert!(cart.is_empty());
    }
}
