//! # Error Types
//!
//! Domain-specific error types for resort-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  resort-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  resort-db errors                                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  resort-client errors                                                  │
//! │  └── StorageError     - Client-local storage failures                  │
//! │                                                                         │
//! │  menu-api errors                                                       │
//! │  └── ApiError         - What the web client sees (code + message)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Foreseeable conditions (unknown promotion, empty cart, stale cache) are
//! NOT errors. They are expressed in return values. The variants below are
//! for caller mistakes and illegal state changes.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Menu item cannot be found.
    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    /// The requested variant label does not exist on the item.
    #[error("Menu item {item_id} has no variant '{label}'")]
    VariantNotFound { item_id: String, label: String },

    /// The item is marked unavailable and cannot be ordered.
    #[error("Menu item {0} is currently unavailable")]
    ItemUnavailable(String),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// A status change that the order lifecycle does not allow.
    ///
    /// ## When This Occurs
    /// - Moving a served order back to preparing
    /// - Skipping straight from pending to served
    /// - Marking a paid order as pending again
    #[error("Cannot move {kind} status from {from} to {to}")]
    InvalidStatusTransition {
        kind: &'static str,
        from: String,
        to: String,
    },

    /// Cart has exceeded maximum allowed entries.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Order has no lines.
    #[error("Order must contain at least one item")]
    EmptyOrder,

    /// An order amount does not fit in `Money`.
    #[error("Order {field} is too large")]
    AmountOverflow { field: &'static str },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, unknown currency code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// A time window whose end precedes its start.
    #[error("{field} ends before it starts")]
    InvertedWindow { field: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::VariantNotFound {
            item_id: "dish-1".to_string(),
            label: "Large".to_string(),
        };
        assert_eq!(err.to_string(), "Menu item dish-1 has no variant 'Large'");

        let err = CoreError::InvalidStatusTransition {
            kind: "order",
            from: "served".to_string(),
            to: "pending".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot move order status from served to pending"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::InvertedWindow {
            field: "promotion".to_string(),
        };
        assert_eq!(err.to_string(), "promotion ends before it starts");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
