//! # Domain Types
//!
//! Menu domain types shared by every layer.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Menu Types                                      │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │◄──│    MenuItem     │──►│    Promotion    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name           │   │  price (minor)  │   │  discount type  │       │
//! │  │  sort_order     │   │  currency       │   │  window         │       │
//! │  └─────────────────┘   │  variants[]     │   │  allow-lists    │       │
//! │                        │  promotion_ids  │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │                                                                         │
//! │  Category and Promotion are referenced by id (weak references).        │
//! │  A dangling reference is tolerated, never an error.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::currency::Currency;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (825 = 8.25%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for configuration input).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Variant
// =============================================================================

/// An alternate purchasable form of a menu item (size, pour, portion).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Variant {
    /// Label shown to the guest ("Small", "Bottle", "Glass").
    pub label: String,

    /// Price in minor units of the variant's currency.
    pub price: Money,

    /// Overrides the item's canonical currency when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
}

impl Variant {
    pub fn new(label: impl Into<String>, price: Money) -> Self {
        Variant {
            label: label.into(),
            price,
            currency: None,
        }
    }

    /// Sets a currency override.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// A dish or drink on the menu.
///
/// ## Invariants
/// - `price >= 0`
/// - When `variants` is non-empty, the first variant's price is the
///   effective base price (see [`MenuItem::effective_price`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MenuItem {
    pub id: String,

    pub name: String,

    /// One-line teaser shown on the menu card.
    #[serde(default)]
    pub short_description: Option<String>,

    /// Full description shown on the detail sheet.
    #[serde(default)]
    pub description: Option<String>,

    /// Canonical price in minor units of `currency`.
    pub price: Money,

    /// Canonical currency the price is stored in.
    #[serde(default)]
    pub currency: Currency,

    /// Weak reference to a [`Category`].
    #[serde(default)]
    pub category_id: Option<String>,

    #[serde(default = "default_available")]
    pub is_available: bool,

    #[serde(default)]
    pub variants: Vec<Variant>,

    /// Weak references to [`Promotion`]s.
    #[serde(default)]
    pub promotion_ids: Vec<String>,

    #[serde(default)]
    pub dietary_tags: BTreeSet<String>,

    #[serde(default)]
    pub allergens: BTreeSet<String>,

    #[serde(default)]
    pub image_url: Option<String>,
}

fn default_available() -> bool {
    true
}

impl MenuItem {
    /// Creates an available item with no variants, promotions or tags.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        MenuItem {
            id: id.into(),
            name: name.into(),
            short_description: None,
            description: None,
            price,
            currency: Currency::default(),
            category_id: None,
            is_available: true,
            variants: Vec::new(),
            promotion_ids: Vec::new(),
            dietary_tags: BTreeSet::new(),
            allergens: BTreeSet::new(),
            image_url: None,
        }
    }

    /// The price the menu shows before promotions.
    ///
    /// First variant's price when variants exist, else the canonical price.
    pub fn effective_price(&self) -> Money {
        self.variants
            .first()
            .map(|v| v.price)
            .unwrap_or(self.price)
    }

    /// The currency that goes with [`MenuItem::effective_price`].
    pub fn effective_currency(&self) -> Currency {
        self.variants
            .first()
            .and_then(|v| v.currency)
            .unwrap_or(self.currency)
    }

    /// Unit price for a purchase of this item with an optional variant.
    ///
    /// The variant's own price wins; otherwise the canonical `price`
    /// field is used as-is.
    pub fn unit_price(&self, variant: Option<&Variant>) -> Money {
        variant.map(|v| v.price).unwrap_or(self.price)
    }

    /// Looks up a variant by its label (case-sensitive).
    pub fn variant(&self, label: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.label == label)
    }
}

// =============================================================================
// Category
// =============================================================================

/// A menu section. `sort_order` is the unique ordering key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub sort_order: i64,
    #[serde(default)]
    pub description: Option<String>,
}

// =============================================================================
// Promotion
// =============================================================================

/// How a promotion's `discount_value` is interpreted.
///
/// | Type           | Unit of `discountValue`           | Example           |
/// |----------------|-----------------------------------|-------------------|
/// | `percentage`   | basis points (1/100 of a percent) | `2000` = 20% off  |
/// | `fixed_amount` | minor units of the item currency  | `150` = $1.50 off |
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DiscountType {
    /// `discount_value` is basis points off the price (2000 = 20%).
    Percentage,
    /// `discount_value` is minor units off the price.
    FixedAmount,
}

/// A time-boxed discount.
///
/// ## Applicability
/// - Active when `is_active` AND `start_date <= now <= end_date`.
/// - Empty allow-lists mean the promotion applies to every item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Promotion {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub discount_type: DiscountType,

    /// Discount size. NOT a plain percent: `percentage` promotions store
    /// basis points (`2000` means 20% off), `fixed_amount` promotions store
    /// minor units of the item's currency. Divide a percentage value by 100
    /// to show it as a percent.
    pub discount_value: i64,

    pub is_active: bool,

    #[ts(as = "String")]
    pub start_date: DateTime<Utc>,

    #[ts(as = "String")]
    pub end_date: DateTime<Utc>,

    #[serde(default)]
    pub applicable_item_ids: Vec<String>,

    #[serde(default)]
    pub applicable_category_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drink() -> MenuItem {
        let mut item = MenuItem::new("wine-1", "House Red", Money::from_minor(900));
        item.variants = vec![
            Variant::new("Glass", Money::from_minor(700)),
            Variant::new("Bottle", Money::from_minor(2800)),
        ];
        item
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        let rate = TaxRate::from_percentage(11.0);
        assert_eq!(rate.bps(), 1100);
        assert!((rate.percentage() - 11.0).abs() < 0.001);
    }

    #[test]
    fn test_effective_price_prefers_first_variant() {
        let item = drink();
        assert_eq!(item.effective_price().minor(), 700);

        let plain = MenuItem::new("dish-1", "Fattoush", Money::from_minor(850));
        assert_eq!(plain.effective_price().minor(), 850);
    }

    #[test]
    fn test_effective_currency_follows_variant_override() {
        let mut item = drink();
        assert_eq!(item.effective_currency(), Currency::Usd);

        item.variants[0].currency = Some(Currency::Lbp);
        assert_eq!(item.effective_currency(), Currency::Lbp);
    }

    #[test]
    fn test_unit_price_uses_raw_price_without_variant() {
        let item = drink();
        assert_eq!(item.unit_price(None).minor(), 900);
        assert_eq!(item.unit_price(item.variant("Bottle")).minor(), 2800);
        assert!(item.variant("Magnum").is_none());
    }

    #[test]
    fn test_percentage_discount_value_is_basis_points() {
        let json = r#"{
            "id": "p1",
            "name": "Happy Hour",
            "discountType": "percentage",
            "discountValue": 2000,
            "isActive": true,
            "startDate": "2026-01-01T00:00:00Z",
            "endDate": "2026-12-31T23:59:59Z"
        }"#;
        let promo: Promotion = serde_json::from_str(json).unwrap();

        // 2000 bps is 20%, so $12.00 becomes $9.60 rather than free.
        assert_eq!(promo.discounted_price(Money::from_minor(1200)).minor(), 960);

        let back = serde_json::to_value(&promo).unwrap();
        assert_eq!(back["discountValue"], 2000);
        assert_eq!(back["discountType"], "percentage");
    }

    #[test]
    fn test_menu_item_deserializes_with_defaults() {
        let json = r#"{"id":"d1","name":"Hummus","price":550}"#;
        let item: MenuItem = serde_json::from_str(json).unwrap();
        assert!(item.is_available);
        assert!(item.variants.is_empty());
        assert_eq!(item.currency, Currency::Usd);
    }
}
