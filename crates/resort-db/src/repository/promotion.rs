//! Promotion repository.
//!
//! `list` returns the catalog in insertion order. The resolver breaks ties
//! by catalog position, so this order is part of the pricing contract.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use super::{from_json_column, to_json_column};
use crate::error::{DbError, DbResult};
use resort_core::{DiscountType, Promotion};

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, description, discount_type, discount_value, is_active,
           start_date, end_date, applicable_item_ids, applicable_category_ids
    FROM promotions
"#;

#[derive(Debug, sqlx::FromRow)]
struct PromotionRow {
    id: String,
    name: String,
    description: Option<String>,
    discount_type: DiscountType,
    discount_value: i64,
    is_active: bool,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    applicable_item_ids: String,
    applicable_category_ids: String,
}

impl TryFrom<PromotionRow> for Promotion {
    type Error = DbError;

    fn try_from(row: PromotionRow) -> DbResult<Self> {
        Ok(Promotion {
            id: row.id,
            name: row.name,
            description: row.description,
            discount_type: row.discount_type,
            discount_value: row.discount_value,
            is_active: row.is_active,
            start_date: row.start_date,
            end_date: row.end_date,
            applicable_item_ids: from_json_column(
                "promotions.applicable_item_ids",
                &row.applicable_item_ids,
            )?,
            applicable_category_ids: from_json_column(
                "promotions.applicable_category_ids",
                &row.applicable_category_ids,
            )?,
        })
    }
}

/// Repository for the promotion catalog.
#[derive(Debug, Clone)]
pub struct PromotionRepository {
    pool: SqlitePool,
}

impl PromotionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PromotionRepository { pool }
    }

    /// The whole catalog, active or not, in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Promotion>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY rowid");
        let rows = sqlx::query_as::<_, PromotionRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Promotion::try_from).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Promotion>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        let row = sqlx::query_as::<_, PromotionRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Promotion::try_from).transpose()
    }

    pub async fn insert(&self, promo: &Promotion) -> DbResult<()> {
        debug!(id = %promo.id, kind = ?promo.discount_type, "Inserting promotion");

        sqlx::query(
            r#"
            INSERT INTO promotions (
                id, name, description, discount_type, discount_value, is_active,
                start_date, end_date, applicable_item_ids, applicable_category_ids,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&promo.id)
        .bind(&promo.name)
        .bind(&promo.description)
        .bind(promo.discount_type)
        .bind(promo.discount_value)
        .bind(promo.is_active)
        .bind(promo.start_date)
        .bind(promo.end_date)
        .bind(to_json_column(
            "promotions.applicable_item_ids",
            &promo.applicable_item_ids,
        )?)
        .bind(to_json_column(
            "promotions.applicable_category_ids",
            &promo.applicable_category_ids,
        )?)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes a promotion. Items still listing its id resolve without it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM promotions WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Promotion", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::Duration;

    fn promo(id: &str, kind: DiscountType, value: i64) -> Promotion {
        let now = Utc::now();
        Promotion {
            id: id.into(),
            name: format!("Promo {id}"),
            description: Some("Sunset deal".into()),
            discount_type: kind,
            discount_value: value,
            is_active: true,
            start_date: now - Duration::hours(1),
            end_date: now + Duration::hours(1),
            applicable_item_ids: vec!["wine".into()],
            applicable_category_ids: vec![],
        }
    }

    #[tokio::test]
    async fn test_round_trip_and_catalog_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.promotions();

        let second = promo("z-second", DiscountType::FixedAmount, 300);
        let first = promo("a-first", DiscountType::Percentage, 2000);
        repo.insert(&second).await.unwrap();
        repo.insert(&first).await.unwrap();

        let catalog = repo.list().await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].id, "z-second");
        assert_eq!(catalog[1].discount_type, DiscountType::Percentage);
        assert_eq!(catalog[1].applicable_item_ids, vec!["wine".to_string()]);
        assert_eq!(catalog[1].start_date, first.start_date);
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.promotions();
        repo.insert(&promo("p", DiscountType::FixedAmount, 100))
            .await
            .unwrap();

        assert!(repo.get_by_id("p").await.unwrap().is_some());
        repo.delete("p").await.unwrap();
        assert!(repo.get_by_id("p").await.unwrap().is_none());
        assert!(matches!(repo.delete("p").await, Err(DbError::NotFound { .. })));
    }
}
