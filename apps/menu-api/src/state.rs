//! Shared application state.

use resort_core::OrderPricing;
use resort_db::{Catalog, Database};

/// Cloned into every handler. `Database` wraps a pooled handle, so clones
/// are cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub pricing: OrderPricing,
}

impl AppState {
    pub fn new(db: Database, pricing: OrderPricing) -> Self {
        AppState { db, pricing }
    }

    pub fn catalog(&self) -> Catalog {
        self.db.catalog()
    }
}
