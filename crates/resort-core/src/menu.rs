//! # Menu Shaping
//!
//! Search, filter and grouping over an already-loaded menu. Everything here
//! is a pure function over slices; the HTTP layer and the offline cache both
//! call into it.
//!
//! ## Ordering
//! - Categories: ascending `sort_order`, ties by name
//! - Items: case-insensitive name, ties by id

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Category, MenuItem};

/// One menu section with its items, as rendered by the menu page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MenuSection {
    pub category: Category,
    pub items: Vec<MenuItem>,
}

fn name_order(a: &MenuItem, b: &MenuItem) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.id.cmp(&b.id))
}

/// Sorts items by name (case-insensitive).
pub fn sort_items_by_name(items: &mut [MenuItem]) {
    items.sort_by(name_order);
}

/// Sorts categories by `sort_order`.
pub fn sort_categories(categories: &mut [Category]) {
    categories.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Case-insensitive substring search.
///
/// Matches name, both descriptions, dietary tags and allergens. A blank
/// query returns every item.
///
/// ```rust
/// use resort_core::menu::search_items;
/// use resort_core::money::Money;
/// use resort_core::types::MenuItem;
///
/// let items = vec![
///     MenuItem::new("1", "Hummus", Money::from_minor(500)),
///     MenuItem::new("2", "Fattoush", Money::from_minor(700)),
/// ];
/// assert_eq!(search_items(&items, "HUM").len(), 1);
/// assert_eq!(search_items(&items, "  ").len(), 2);
/// ```
pub fn search_items(items: &[MenuItem], query: &str) -> Vec<MenuItem> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }

    let hit = |text: &str| text.to_lowercase().contains(&needle);

    items
        .iter()
        .filter(|item| {
            hit(&item.name)
                || item.short_description.as_deref().is_some_and(hit)
                || item.description.as_deref().is_some_and(hit)
                || item.dietary_tags.iter().any(|t| hit(t))
                || item.allergens.iter().any(|t| hit(t))
        })
        .cloned()
        .collect()
}

/// Items whose `category_id` equals `category_id`.
pub fn filter_by_category(items: &[MenuItem], category_id: &str) -> Vec<MenuItem> {
    items
        .iter()
        .filter(|item| item.category_id.as_deref() == Some(category_id))
        .cloned()
        .collect()
}

/// Items currently orderable.
pub fn available_only(items: &[MenuItem]) -> Vec<MenuItem> {
    items.iter().filter(|i| i.is_available).cloned().collect()
}

/// Groups items under their categories.
///
/// Categories come out in sort order and keep empty sections out. Items
/// whose category id matches nothing are dropped from the grouped view.
pub fn group_by_category(items: &[MenuItem], categories: &[Category]) -> Vec<MenuSection> {
    let mut categories = categories.to_vec();
    sort_categories(&mut categories);

    categories
        .into_iter()
        .filter_map(|category| {
            let mut section_items = filter_by_category(items, &category.id);
            if section_items.is_empty() {
                return None;
            }
            sort_items_by_name(&mut section_items);
            Some(MenuSection {
                category,
                items: section_items,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn item(id: &str, name: &str, cat: Option<&str>) -> MenuItem {
        let mut i = MenuItem::new(id, name, Money::from_minor(500));
        i.category_id = cat.map(str::to_string);
        i
    }

    fn cat(id: &str, order: i64) -> Category {
        Category {
            id: id.to_string(),
            name: id.to_uppercase(),
            sort_order: order,
            description: None,
        }
    }

    #[test]
    fn test_search_matches_descriptions_and_tags() {
        let mut salad = item("1", "Tabbouleh", None);
        salad.short_description = Some("Parsley and bulgur".into());
        salad.dietary_tags.insert("vegan".into());
        let mut fish = item("2", "Sayadieh", None);
        fish.allergens.insert("Fish".into());
        let items = vec![salad, fish];

        assert_eq!(search_items(&items, "bulgur")[0].id, "1");
        assert_eq!(search_items(&items, "VEGAN")[0].id, "1");
        assert_eq!(search_items(&items, "fish")[0].id, "2");
        assert!(search_items(&items, "lamb").is_empty());
    }

    #[test]
    fn test_filter_and_availability() {
        let mut off = item("2", "Kibbeh", Some("mezze"));
        off.is_available = false;
        let items = vec![item("1", "Hummus", Some("mezze")), off, item("3", "Steak", Some("grill"))];

        assert_eq!(filter_by_category(&items, "mezze").len(), 2);
        assert_eq!(available_only(&items).len(), 2);
    }

    #[test]
    fn test_group_by_category_orders_sections_and_items() {
        let items = vec![
            item("a", "zaatar manousheh", Some("bakery")),
            item("b", "Cheese Manousheh", Some("bakery")),
            item("c", "Hummus", Some("mezze")),
            item("d", "Orphan", Some("gone")),
            item("e", "Loose", None),
        ];
        let cats = vec![cat("mezze", 2), cat("bakery", 1), cat("desserts", 3)];

        let sections = group_by_category(&items, &cats);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].category.id, "bakery");
        assert_eq!(sections[0].items[0].id, "b");
        assert_eq!(sections[1].category.id, "mezze");
    }

    #[test]
    fn test_sort_categories_ties_by_name() {
        let mut cats = vec![cat("b", 1), cat("a", 1), cat("c", 0)];
        sort_categories(&mut cats);
        let ids: Vec<_> = cats.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }
}
