//! # Validation Module
//!
//! Input validation for menu records, orders and query parameters.
//!
//! ## Where Validation Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Web client ──► menu-api handler ──► THIS MODULE ──► resort-db          │
//! │                  (deserialize)        (rules)         (constraints)     │
//! │                                                                         │
//! │  Seed data and admin writes go through the same functions before they  │
//! │  reach a repository.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use resort_core::validation::{validate_name, validate_quantity};
//!
//! validate_name("Mezze Platter").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::{DiscountType, MenuItem, Promotion};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of item and category names.
pub const MAX_NAME_LEN: usize = 120;

/// Maximum length of a free-text search query.
pub const MAX_QUERY_LEN: usize = 100;

/// Maximum length of a table label on an order.
pub const MAX_TABLE_LABEL_LEN: usize = 20;

/// Largest tip accepted on an order, in minor units of the order currency.
pub const MAX_TIP_MINOR: i64 = 1_000_000_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (menu item, category or promotion).
///
/// ## Rules
/// - Must not be blank
/// - At most [`MAX_NAME_LEN`] characters
///
/// ```rust
/// use resort_core::validation::validate_name;
///
/// assert!(validate_name("Fattoush").is_ok());
/// assert!(validate_name("   ").is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a search query and returns it trimmed.
///
/// Empty is allowed and means "no filter".
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

/// Validates the optional table label attached to an order.
pub fn validate_table_label(label: &str) -> ValidationResult<()> {
    let label = label.trim();

    if label.is_empty() {
        return Err(ValidationError::Required {
            field: "table".to_string(),
        });
    }

    if label.chars().count() > MAX_TABLE_LABEL_LEN {
        return Err(ValidationError::TooLong {
            field: "table".to_string(),
            max: MAX_TABLE_LABEL_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a purchase quantity.
///
/// ## Rules
/// - Must be positive
/// - Must not exceed [`MAX_ITEM_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in minor units. Zero is allowed (complimentary items).
pub fn validate_price(minor: i64) -> ValidationResult<()> {
    if minor < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a tip in minor units: `0..=MAX_TIP_MINOR`.
pub fn validate_tip(minor: i64) -> ValidationResult<()> {
    if !(0..=MAX_TIP_MINOR).contains(&minor) {
        return Err(ValidationError::OutOfRange {
            field: "tip".to_string(),
            min: 0,
            max: MAX_TIP_MINOR,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0 to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a menu item before it is stored.
///
/// ## Rules
/// - Name passes [`validate_name`]
/// - Item price and every variant price are non-negative
/// - Variant labels are non-blank and unique within the item
pub fn validate_menu_item(item: &MenuItem) -> ValidationResult<()> {
    if item.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    validate_name(&item.name)?;
    validate_price(item.price.minor())?;

    for (i, variant) in item.variants.iter().enumerate() {
        if variant.label.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "variant.label".to_string(),
            });
        }
        validate_price(variant.price.minor())?;

        if item.variants[..i].iter().any(|v| v.label == variant.label) {
            return Err(ValidationError::InvalidFormat {
                field: "variants".to_string(),
                reason: format!("duplicate label '{}'", variant.label),
            });
        }
    }

    Ok(())
}

/// Validates a promotion before it is stored.
///
/// ## Rules
/// - Name passes [`validate_name`]
/// - `start_date <= end_date`
/// - Percentage: `0..=10000` basis points
/// - Fixed amount: non-negative
pub fn validate_promotion(promo: &Promotion) -> ValidationResult<()> {
    validate_name(&promo.name)?;

    if promo.start_date > promo.end_date {
        return Err(ValidationError::InvertedWindow {
            field: "promotion".to_string(),
        });
    }

    match promo.discount_type {
        DiscountType::Percentage if !(0..=10000).contains(&promo.discount_value) => {
            Err(ValidationError::OutOfRange {
                field: "discount_value".to_string(),
                min: 0,
                max: 10000,
            })
        }
        DiscountType::FixedAmount if promo.discount_value < 0 => {
            Err(ValidationError::OutOfRange {
                field: "discount_value".to_string(),
                min: 0,
                max: i64::MAX,
            })
        }
        _ => Ok(()),
    }
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string (order ids are UUIDs).
///
/// ```rust
/// use resort_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("table-7").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::Variant;
    use chrono::{Duration, Utc};

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Mezze Platter").is_ok());
        assert!(validate_name("تبولة").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_search_query_trims() {
        assert_eq!(validate_search_query("  hummus ").unwrap(), "hummus");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-2).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_menu_item_variants() {
        let mut item = MenuItem::new("w1", "House White", Money::from_minor(800));
        item.variants = vec![
            Variant::new("Glass", Money::from_minor(600)),
            Variant::new("Bottle", Money::from_minor(2400)),
        ];
        assert!(validate_menu_item(&item).is_ok());

        item.variants.push(Variant::new("Glass", Money::from_minor(650)));
        assert!(validate_menu_item(&item).is_err());

        item.variants.pop();
        item.variants[1].price = Money::from_minor(-1);
        assert!(validate_menu_item(&item).is_err());
    }

    #[test]
    fn test_validate_promotion() {
        let now = Utc::now();
        let mut promo = Promotion {
            id: "p".into(),
            name: "Sunset".into(),
            description: None,
            discount_type: DiscountType::Percentage,
            discount_value: 1500,
            is_active: true,
            start_date: now,
            end_date: now + Duration::hours(2),
            applicable_item_ids: vec![],
            applicable_category_ids: vec![],
        };
        assert!(validate_promotion(&promo).is_ok());

        promo.discount_value = 10001;
        assert!(validate_promotion(&promo).is_err());

        promo.discount_value = 1500;
        promo.end_date = now - Duration::hours(1);
        assert!(matches!(
            validate_promotion(&promo),
            Err(ValidationError::InvertedWindow { .. })
        ));
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("nope").is_err());
    }

    #[test]
    fn test_validate_tax_and_tip() {
        assert!(validate_tax_rate_bps(1100).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
        assert!(validate_tip(0).is_ok());
        assert!(validate_tip(-1).is_err());
        assert!(validate_tip(MAX_TIP_MINOR).is_ok());
        assert!(validate_tip(MAX_TIP_MINOR + 1).is_err());
        assert!(validate_tip(i64::MAX).is_err());
    }
}
