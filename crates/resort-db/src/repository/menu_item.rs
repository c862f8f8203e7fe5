//! # Menu Item Repository
//!
//! ## Column Mapping
//! ```text
//! ┌──────────────────────┬──────────────────────────────────────────────┐
//! │ MenuItem field       │ menu_items column                            │
//! ├──────────────────────┼──────────────────────────────────────────────┤
//! │ price                │ price INTEGER (minor units)                  │
//! │ currency             │ currency TEXT ('USD' / 'LBP')                │
//! │ variants             │ variants TEXT (JSON array)                   │
//! │ promotion_ids        │ promotion_ids TEXT (JSON array)              │
//! │ dietary_tags         │ dietary_tags TEXT (JSON array)               │
//! │ allergens            │ allergens TEXT (JSON array)                  │
//! └──────────────────────┴──────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::{from_json_column, to_json_column};
use crate::error::{DbError, DbResult};
use resort_core::{Currency, MenuItem, Money};

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, short_description, description, price, currency,
           category_id, is_available, variants, promotion_ids,
           dietary_tags, allergens, image_url
    FROM menu_items
"#;

#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    id: String,
    name: String,
    short_description: Option<String>,
    description: Option<String>,
    price: i64,
    currency: String,
    category_id: Option<String>,
    is_available: bool,
    variants: String,
    promotion_ids: String,
    dietary_tags: String,
    allergens: String,
    image_url: Option<String>,
}

impl TryFrom<MenuItemRow> for MenuItem {
    type Error = DbError;

    fn try_from(row: MenuItemRow) -> DbResult<Self> {
        let currency: Currency = row.currency.parse().map_err(|_| DbError::InvalidValue {
            column: "menu_items.currency",
            value: row.currency.clone(),
        })?;

        Ok(MenuItem {
            id: row.id,
            name: row.name,
            short_description: row.short_description,
            description: row.description,
            price: Money::from_minor(row.price),
            currency,
            category_id: row.category_id,
            is_available: row.is_available,
            variants: from_json_column("menu_items.variants", &row.variants)?,
            promotion_ids: from_json_column("menu_items.promotion_ids", &row.promotion_ids)?,
            dietary_tags: from_json_column("menu_items.dietary_tags", &row.dietary_tags)?,
            allergens: from_json_column("menu_items.allergens", &row.allergens)?,
            image_url: row.image_url,
        })
    }
}

fn into_items(rows: Vec<MenuItemRow>) -> DbResult<Vec<MenuItem>> {
    rows.into_iter().map(MenuItem::try_from).collect()
}

/// Repository for menu items.
#[derive(Debug, Clone)]
pub struct MenuItemRepository {
    pool: SqlitePool,
}

impl MenuItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        MenuItemRepository { pool }
    }

    /// All items ordered by name (case-insensitive).
    pub async fn list(&self) -> DbResult<Vec<MenuItem>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY name COLLATE NOCASE, id");
        let rows = sqlx::query_as::<_, MenuItemRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        into_items(rows)
    }

    /// Items in one category, ordered by name.
    pub async fn list_by_category(&self, category_id: &str) -> DbResult<Vec<MenuItem>> {
        let sql = format!(
            "{SELECT_COLUMNS} WHERE category_id = ?1 ORDER BY name COLLATE NOCASE, id"
        );
        let rows = sqlx::query_as::<_, MenuItemRow>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;

        into_items(rows)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<MenuItem>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        let row = sqlx::query_as::<_, MenuItemRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(MenuItem::try_from).transpose()
    }

    pub async fn insert(&self, item: &MenuItem) -> DbResult<()> {
        debug!(id = %item.id, name = %item.name, "Inserting menu item");
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO menu_items (
                id, name, short_description, description, price, currency,
                category_id, is_available, variants, promotion_ids,
                dietary_tags, allergens, image_url, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14, ?14
            )
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.short_description)
        .bind(&item.description)
        .bind(item.price.minor())
        .bind(item.currency.code())
        .bind(&item.category_id)
        .bind(item.is_available)
        .bind(to_json_column("menu_items.variants", &item.variants)?)
        .bind(to_json_column("menu_items.promotion_ids", &item.promotion_ids)?)
        .bind(to_json_column("menu_items.dietary_tags", &item.dietary_tags)?)
        .bind(to_json_column("menu_items.allergens", &item.allergens)?)
        .bind(&item.image_url)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Replaces every field of an existing item.
    pub async fn update(&self, item: &MenuItem) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE menu_items SET
                name = ?2, short_description = ?3, description = ?4,
                price = ?5, currency = ?6, category_id = ?7, is_available = ?8,
                variants = ?9, promotion_ids = ?10, dietary_tags = ?11,
                allergens = ?12, image_url = ?13, updated_at = ?14
            WHERE id = ?1
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.short_description)
        .bind(&item.description)
        .bind(item.price.minor())
        .bind(item.currency.code())
        .bind(&item.category_id)
        .bind(item.is_available)
        .bind(to_json_column("menu_items.variants", &item.variants)?)
        .bind(to_json_column("menu_items.promotion_ids", &item.promotion_ids)?)
        .bind(to_json_column("menu_items.dietary_tags", &item.dietary_tags)?)
        .bind(to_json_column("menu_items.allergens", &item.allergens)?)
        .bind(&item.image_url)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuItem", &item.id));
        }

        Ok(())
    }

    /// Switches an item on or off without touching anything else.
    pub async fn set_availability(&self, id: &str, available: bool) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE menu_items SET is_available = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(available)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuItem", id));
        }

        debug!(id = %id, available, "Menu item availability changed");
        Ok(())
    }

    /// Deletes an item. Fails with a foreign key violation while past order
    /// lines still reference it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuItem", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use resort_core::Variant;

    fn wine() -> MenuItem {
        let mut item = MenuItem::new("wine", "house red", Money::from_minor(900));
        item.category_id = Some("drinks".into());
        item.variants = vec![
            Variant::new("Glass", Money::from_minor(700)),
            Variant::new("Bottle", Money::from_minor(280_000)).with_currency(Currency::Lbp),
        ];
        item.promotion_ids = vec!["happy-hour".into()];
        item.dietary_tags.insert("vegan".into());
        item.allergens.insert("sulphites".into());
        item
    }

    #[tokio::test]
    async fn test_insert_and_get_preserves_json_columns() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.menu_items();

        repo.insert(&wine()).await.unwrap();
        let loaded = repo.get_by_id("wine").await.unwrap().unwrap();

        assert_eq!(loaded, wine());
        assert!(repo.get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_orders_by_name_case_insensitive() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.menu_items();

        repo.insert(&MenuItem::new("1", "Zaatar", Money::from_minor(300)))
            .await
            .unwrap();
        repo.insert(&wine()).await.unwrap();
        repo.insert(&MenuItem::new("3", "Arak", Money::from_minor(800)))
            .await
            .unwrap();

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, ["Arak", "house red", "Zaatar"]);
        assert_eq!(repo.list_by_category("drinks").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_availability() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.menu_items();
        repo.insert(&wine()).await.unwrap();

        let mut changed = wine();
        changed.price = Money::from_minor(950);
        changed.variants.clear();
        repo.update(&changed).await.unwrap();

        repo.set_availability("wine", false).await.unwrap();
        let loaded = repo.get_by_id("wine").await.unwrap().unwrap();
        assert_eq!(loaded.price.minor(), 950);
        assert!(loaded.variants.is_empty());
        assert!(!loaded.is_available);

        assert!(matches!(
            repo.set_availability("ghost", true).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_json_column_is_reported() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.menu_items();
        repo.insert(&wine()).await.unwrap();

        sqlx::query("UPDATE menu_items SET variants = 'not json' WHERE id = 'wine'")
            .execute(db.pool())
            .await
            .unwrap();

        assert!(matches!(
            repo.get_by_id("wine").await,
            Err(DbError::MalformedColumn { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.menu_items();
        repo.insert(&wine()).await.unwrap();

        repo.delete("wine").await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
        assert!(repo.delete("wine").await.is_err());
    }
}
