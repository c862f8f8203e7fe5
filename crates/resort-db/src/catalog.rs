//! # Catalog
//!
//! Read-side facade over the menu tables for the customer site.
//!
//! Every call yields a [`Listing`]: either the rows with `error: None`, or
//! an empty list with a human-readable error. A failed menu read must
//! still render a page, so nothing here returns `Err`.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::DbResult;
use crate::pool::Database;
use resort_core::{Category, MenuItem, Promotion};

/// Data-or-error wrapper returned by catalog reads.
///
/// ## Invariant
/// `error.is_some()` implies `data.is_empty()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing<T> {
    pub data: Vec<T>,
    pub error: Option<String>,
}

impl<T> Listing<T> {
    pub fn ok(data: Vec<T>) -> Self {
        Listing { data, error: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Listing {
            data: Vec::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    fn from_result(what: &'static str, result: DbResult<Vec<T>>) -> Self {
        match result {
            Ok(data) => Listing::ok(data),
            Err(e) => {
                error!(error = %e, what, "Catalog read failed");
                Listing::failed(format!("Could not load {what}"))
            }
        }
    }
}

/// Menu reads that never fail.
#[derive(Debug, Clone)]
pub struct Catalog {
    db: Database,
}

impl Catalog {
    pub fn new(db: Database) -> Self {
        Catalog { db }
    }

    /// Every menu item, ordered by name.
    pub async fn menu_items(&self) -> Listing<MenuItem> {
        Listing::from_result("menu items", self.db.menu_items().list().await)
    }

    /// Items of one category, ordered by name. An unknown category yields
    /// an empty, successful listing.
    pub async fn menu_items_in(&self, category_id: &str) -> Listing<MenuItem> {
        Listing::from_result(
            "menu items",
            self.db.menu_items().list_by_category(category_id).await,
        )
    }

    /// Every category, ordered by sort order.
    pub async fn categories(&self) -> Listing<Category> {
        Listing::from_result("categories", self.db.categories().list().await)
    }

    /// The promotion catalog in its fixed order.
    pub async fn promotions(&self) -> Listing<Promotion> {
        Listing::from_result("promotions", self.db.promotions().list().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;
    use resort_core::Money;

    #[tokio::test]
    async fn test_listing_success() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut item = MenuItem::new("1", "Hummus", Money::from_minor(500));
        item.category_id = Some("mezze".into());
        db.menu_items().insert(&item).await.unwrap();

        let catalog = db.catalog();
        let all = catalog.menu_items().await;
        assert!(all.is_ok());
        assert_eq!(all.data.len(), 1);

        let none = catalog.menu_items_in("grill").await;
        assert!(none.is_ok());
        assert!(none.data.is_empty());
    }

    #[tokio::test]
    async fn test_listing_failure_carries_message_and_no_data() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        let listing = db.catalog().categories().await;
        assert!(listing.data.is_empty());
        assert_eq!(listing.error.as_deref(), Some("Could not load categories"));
    }

    #[test]
    fn test_listing_json_shape() {
        let json = serde_json::to_string(&Listing::<Category>::failed("boom")).unwrap();
        assert_eq!(json, r#"{"data":[],"error":"boom"}"#);
    }
}
