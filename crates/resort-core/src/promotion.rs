//! # Promotion Resolver
//!
//! Picks the best applicable discount for a menu item.
//!
//! ## Resolution Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  catalog (fixed order)                                                  │
//! │       │                                                                 │
//! │       ▼  referenced by item.promotion_ids?        no → skip             │
//! │       ▼  is_active && start <= now <= end?        no → skip             │
//! │       ▼  allow-lists empty, or item/category in?  no → skip             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  candidate price = (price - discount) floored at 0                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  keep the largest saving; ties keep the earlier promotion               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here fails. A promotion id with no catalog entry is skipped like
//! an expired one; it is additionally listed in
//! [`PriceResolution::unresolved_promotion_ids`] so callers can log it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{DiscountType, MenuItem, Promotion};

/// Outcome of pricing one item against the promotion catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PriceResolution {
    pub original_price: Money,
    pub discounted_price: Money,
    /// `original_price - discounted_price`, never negative.
    pub savings: Money,
    /// Every promotion that passed the activity and applicability checks,
    /// in catalog order. Not just the winner.
    pub active_promotions: Vec<Promotion>,
    pub has_discount: bool,
    /// Referenced ids absent from the catalog.
    pub unresolved_promotion_ids: Vec<String>,
}

impl Promotion {
    /// Active flag set and `now` inside `[start_date, end_date]`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.start_date <= now && now <= self.end_date
    }

    /// Allow-list check. Empty lists mean every item qualifies.
    ///
    /// When both lists are set, membership in either is enough.
    pub fn applies_to(&self, item: &MenuItem) -> bool {
        if self.applicable_item_ids.is_empty() && self.applicable_category_ids.is_empty() {
            return true;
        }

        let by_item = self.applicable_item_ids.iter().any(|id| *id == item.id);
        let by_category = item
            .category_id
            .as_ref()
            .map(|cat| self.applicable_category_ids.iter().any(|id| id == cat))
            .unwrap_or(false);

        by_item || by_category
    }

    /// Price after this promotion, floored at zero.
    pub fn discounted_price(&self, price: Money) -> Money {
        match self.discount_type {
            DiscountType::Percentage => {
                let bps = self.discount_value.clamp(0, u32::MAX as i64) as u32;
                price.apply_percentage_discount(bps).floor_zero()
            }
            DiscountType::FixedAmount => {
                (price - Money::from_minor(self.discount_value.max(0))).floor_zero()
            }
        }
    }
}

/// Resolves the displayed price of `item` at instant `now`.
///
/// The base price is [`MenuItem::effective_price`].
///
/// ```rust
/// use chrono::{Duration, Utc};
/// use resort_core::money::Money;
/// use resort_core::promotion::resolve_price;
/// use resort_core::types::{DiscountType, MenuItem, Promotion};
///
/// let now = Utc::now();
/// let promo = Promotion {
///     id: "happy-hour".into(),
///     name: "Happy hour".into(),
///     description: None,
///     discount_type: DiscountType::Percentage,
///     discount_value: 2000,
///     is_active: true,
///     start_date: now - Duration::hours(1),
///     end_date: now + Duration::hours(1),
///     applicable_item_ids: vec![],
///     applicable_category_ids: vec![],
/// };
/// let mut item = MenuItem::new("mojito", "Mojito", Money::from_minor(1200));
/// item.promotion_ids.push("happy-hour".into());
///
/// let res = resolve_price(&item, &[promo], now);
/// assert_eq!(res.discounted_price.minor(), 960);
/// assert!(res.has_discount);
/// ```
pub fn resolve_price(item: &MenuItem, catalog: &[Promotion], now: DateTime<Utc>) -> PriceResolution {
    let original = item.effective_price();

    let unresolved_promotion_ids = item
        .promotion_ids
        .iter()
        .filter(|id| !catalog.iter().any(|p| p.id == **id))
        .cloned()
        .collect();

    let active_promotions: Vec<Promotion> = catalog
        .iter()
        .filter(|p| item.promotion_ids.iter().any(|id| *id == p.id))
        .filter(|p| p.is_active_at(now))
        .filter(|p| p.applies_to(item))
        .cloned()
        .collect();

    let mut best = original;
    for promo in &active_promotions {
        let candidate = promo.discounted_price(original);
        // strict: on equal savings the earlier promotion stays
        if candidate < best {
            best = candidate;
        }
    }

    let savings = original - best;

    PriceResolution {
        original_price: original,
        discounted_price: best,
        savings,
        active_promotions,
        has_discount: savings.is_positive(),
        unresolved_promotion_ids,
    }
}
