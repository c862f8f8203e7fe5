//! # Offline Menu Cache
//!
//! Keeps the last menu the guest saw so the page still renders when the
//! resort Wi-Fi drops.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fetch ok ──► save(items, categories, now)                              │
//! │                                                                         │
//! │  fetch failed ──► load_fresh(now)                                       │
//! │                     │                                                   │
//! │                     ├── nothing stored        → None                    │
//! │                     ├── malformed             → None (logged)           │
//! │                     ├── now - lastUpdated ≥ max_age → None              │
//! │                     └── otherwise             → Some(snapshot)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A snapshot stamped in the future (device clock moved back) is treated
//! as fresh.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ClientResult;
use crate::storage::{keys, load_json, save_json, KeyValueStore};
use resort_core::{Category, MenuItem};

/// Default freshness window.
pub const DEFAULT_MAX_AGE_HOURS: i64 = 24;

/// A saved copy of the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSnapshot {
    pub items: Vec<MenuItem>,
    pub categories: Vec<Category>,
    pub last_updated: DateTime<Utc>,
}

impl MenuSnapshot {
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now - self.last_updated < max_age
    }
}

/// Offline copy of the menu with a freshness window.
#[derive(Debug)]
pub struct OfflineMenuCache<S> {
    store: S,
    max_age: Duration,
}

impl<S: KeyValueStore> OfflineMenuCache<S> {
    pub fn new(store: S) -> Self {
        OfflineMenuCache::with_max_age(store, Duration::hours(DEFAULT_MAX_AGE_HOURS))
    }

    pub fn with_max_age(store: S, max_age: Duration) -> Self {
        OfflineMenuCache { store, max_age }
    }

    /// Replaces the stored snapshot.
    pub fn save(
        &self,
        items: &[MenuItem],
        categories: &[Category],
        now: DateTime<Utc>,
    ) -> ClientResult<()> {
        let snapshot = MenuSnapshot {
            items: items.to_vec(),
            categories: categories.to_vec(),
            last_updated: now,
        };
        save_json(&self.store, keys::OFFLINE_MENU, &snapshot)?;
        debug!(items = items.len(), "Offline menu saved");
        Ok(())
    }

    /// The stored snapshot regardless of age.
    pub fn load_any(&self) -> Option<MenuSnapshot> {
        match load_json(&self.store, keys::OFFLINE_MENU) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Could not read offline menu");
                None
            }
        }
    }

    /// The stored snapshot if it is younger than the freshness window.
    pub fn load_fresh(&self, now: DateTime<Utc>) -> Option<MenuSnapshot> {
        let snapshot = self.load_any()?;
        if snapshot.is_fresh(now, self.max_age) {
            Some(snapshot)
        } else {
            debug!(last_updated = %snapshot.last_updated, "Offline menu is stale");
            None
        }
    }

    pub fn clear(&self) -> ClientResult<()> {
        self.store.remove(keys::OFFLINE_MENU)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use resort_core::Money;

    fn menu() -> (Vec<MenuItem>, Vec<Category>) {
        let items = vec![MenuItem::new("1", "Hummus", Money::from_minor(550))];
        let categories = vec![Category {
            id: "mezze".into(),
            name: "Mezze".into(),
            sort_order: 1,
            description: None,
        }];
        (items, categories)
    }

    #[test]
    fn test_fresh_snapshot_is_returned() {
        let cache = OfflineMenuCache::new(MemoryStore::new());
        let (items, cats) = menu();
        let saved_at = Utc::now();
        cache.save(&items, &cats, saved_at).unwrap();

        let snap = cache.load_fresh(saved_at + Duration::hours(23)).unwrap();
        assert_eq!(snap.items, items);
        assert_eq!(snap.categories, cats);
        assert_eq!(snap.last_updated, saved_at);
    }

    #[test]
    fn test_stale_snapshot_is_ignored() {
        let cache = OfflineMenuCache::new(MemoryStore::new());
        let (items, cats) = menu();
        let saved_at = Utc::now();
        cache.save(&items, &cats, saved_at).unwrap();

        assert!(cache.load_fresh(saved_at + Duration::hours(24)).is_none());
        assert!(cache.load_any().is_some());
    }

    #[test]
    fn test_custom_window_and_future_stamp() {
        let cache = OfflineMenuCache::with_max_age(MemoryStore::new(), Duration::minutes(30));
        let (items, cats) = menu();
        let saved_at = Utc::now();
        cache.save(&items, &cats, saved_at).unwrap();

        assert!(cache.load_fresh(saved_at + Duration::minutes(31)).is_none());
        assert!(cache.load_fresh(saved_at - Duration::hours(2)).is_some());
    }

    #[test]
    fn test_malformed_snapshot_is_ignored() {
        let store = MemoryStore::new();
        store.set(keys::OFFLINE_MENU, r#"{"items": 3}"#).unwrap();
        let cache = OfflineMenuCache::new(store);
        assert!(cache.load_fresh(Utc::now()).is_none());
    }

    #[test]
    fn test_snapshot_json_uses_last_updated_key() {
        let store = MemoryStore::new();
        let cache = OfflineMenuCache::new(store.clone());
        let (items, cats) = menu();
        cache.save(&items, &cats, Utc::now()).unwrap();

        let raw = store.get(keys::OFFLINE_MENU).unwrap().unwrap();
        assert!(raw.contains("\"lastUpdated\""));

        cache.clear().unwrap();
        assert!(cache.load_any().is_none());
    }
}
