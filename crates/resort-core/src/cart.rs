//! # Cart Aggregator
//!
//! The guest's cart: a list of (item, quantity, variant) entries.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Guest Action            Cart Method              Effect                │
//! │  ────────────            ───────────              ──────                │
//! │                                                                         │
//! │  Tap "Add"  ───────────► add_item() ─────────────► qty += n or push     │
//! │                                                                         │
//! │  Stepper    ───────────► update_quantity() ──────► qty = n (n<=0: drop) │
//! │                                                                         │
//! │  Swipe      ───────────► remove_item() ──────────► drop (absent: no-op) │
//! │                                                                         │
//! │  "Clear"    ───────────► clear() ────────────────► empty                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Key
//! Two entries are the same entry when the item id AND the chosen variant
//! match. A small and a large of the same dish are two entries.
//!
//! ## Pricing
//! Totals read the item's stored price (or the variant's). The promotion
//! resolver is NOT consulted; a discounted price must be written into the
//! item before it is added.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{MenuItem, Variant};
use crate::validation::validate_quantity;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// One cart entry. The item is held by value (snapshot at add time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    pub item: MenuItem,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
}

impl CartItem {
    fn matches(&self, item_id: &str, variant: Option<&Variant>) -> bool {
        self.item.id == item_id && self.variant.as_ref() == variant
    }

    /// Variant price if a variant is selected, else the item's price.
    pub fn unit_price(&self) -> Money {
        self.item.unit_price(self.variant.as_ref())
    }

    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Entries are unique by (item id, variant)
/// - Every quantity is in `1..=MAX_ITEM_QUANTITY`
/// - At most `MAX_CART_ITEMS` entries
/// - Entry order is insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    /// Rebuilds a cart from persisted entries.
    ///
    /// Entries with a non-positive quantity are dropped and duplicates are
    /// merged, so a hand-edited or older snapshot still satisfies the
    /// invariants.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Cart::new();
        for entry in items.into_iter().filter(|e| e.quantity > 0) {
            match cart
                .items
                .iter_mut()
                .find(|e| e.matches(&entry.item.id, entry.variant.as_ref()))
            {
                Some(existing) => {
                    existing.quantity = (existing.quantity + entry.quantity).min(MAX_ITEM_QUANTITY)
                }
                None => cart.items.push(CartItem {
                    quantity: entry.quantity.min(MAX_ITEM_QUANTITY),
                    ..entry
                }),
            }
        }
        cart
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Adds `quantity` of an item, merging into an existing entry.
    ///
    /// ## Errors
    /// - `quantity` not positive
    /// - merged quantity would exceed `MAX_ITEM_QUANTITY`
    /// - a new entry would exceed `MAX_CART_ITEMS`
    pub fn add_item(
        &mut self,
        item: &MenuItem,
        quantity: i64,
        variant: Option<&Variant>,
    ) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(entry) = self.items.iter_mut().find(|e| e.matches(&item.id, variant)) {
            let new_qty = entry.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            entry.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(CartItem {
            item: item.clone(),
            quantity,
            variant: variant.cloned(),
        });
        Ok(())
    }

    /// Removes the matching entry. Absent entries are a no-op.
    ///
    /// Returns whether an entry was removed.
    pub fn remove_item(&mut self, item_id: &str, variant: Option<&Variant>) -> bool {
        let before = self.items.len();
        self.items.retain(|e| !e.matches(item_id, variant));
        self.items.len() != before
    }

    /// Sets the quantity of the matching entry.
    ///
    /// A quantity of zero or less removes the entry. Setting the quantity
    /// of an entry that is not in the cart does nothing.
    pub fn update_quantity(
        &mut self,
        item_id: &str,
        quantity: i64,
        variant: Option<&Variant>,
    ) -> CoreResult<()> {
        if quantity <= 0 {
            self.remove_item(item_id, variant);
            return Ok(());
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        if let Some(entry) = self.items.iter_mut().find(|e| e.matches(item_id, variant)) {
            entry.quantity = quantity;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of distinct entries.
    pub fn entry_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities across all entries.
    pub fn total_items(&self) -> i64 {
        self.items.iter().map(|e| e.quantity).sum()
    }

    /// Sum of `unit price × quantity` across all entries.
    pub fn total_price(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cart totals summary for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub entry_count: i64,
    pub total_items: i64,
    pub total_price: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            entry_count: cart.entry_count() as i64,
            total_items: cart.total_items(),
            total_price: cart.total_price(),
        }
    }
}
