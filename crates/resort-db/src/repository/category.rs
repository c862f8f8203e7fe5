//! Category repository.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use resort_core::Category;

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: String,
    name: String,
    sort_order: i64,
    description: Option<String>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            sort_order: row.sort_order,
            description: row.description,
        }
    }
}

/// Repository for menu sections.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// All categories in display order.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, sort_order, description
            FROM categories
            ORDER BY sort_order, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, sort_order, description FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Category::from))
    }

    /// Inserts a category. `sort_order` must be unused.
    pub async fn insert(&self, category: &Category) -> DbResult<()> {
        debug!(id = %category.id, sort_order = category.sort_order, "Inserting category");

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, sort_order, description)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(category.sort_order)
        .bind(&category.description)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update(&self, category: &Category) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE categories SET name = ?2, sort_order = ?3, description = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(category.sort_order)
        .bind(&category.description)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", &category.id));
        }

        Ok(())
    }

    /// Deletes a category. Items that referenced it keep the dangling id.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        debug!(id = %id, "Deleted category");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn cat(id: &str, name: &str, order: i64) -> Category {
        Category {
            id: id.into(),
            name: name.into(),
            sort_order: order,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_list_orders_by_sort_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        repo.insert(&cat("drinks", "Drinks", 3)).await.unwrap();
        repo.insert(&cat("mezze", "Mezze", 1)).await.unwrap();
        repo.insert(&cat("grill", "Grill", 2)).await.unwrap();

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, ["mezze", "grill", "drinks"]);
    }

    #[tokio::test]
    async fn test_sort_order_is_unique() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        repo.insert(&cat("a", "A", 1)).await.unwrap();
        let err = repo.insert(&cat("b", "B", 1)).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        repo.insert(&cat("a", "Starters", 1)).await.unwrap();
        repo.update(&cat("a", "Cold Starters", 1)).await.unwrap();
        assert_eq!(repo.get_by_id("a").await.unwrap().unwrap().name, "Cold Starters");

        repo.delete("a").await.unwrap();
        assert!(repo.get_by_id("a").await.unwrap().is_none());
        assert!(matches!(
            repo.delete("a").await,
            Err(DbError::NotFound { .. })
        ));
        assert!(repo.update(&cat("zz", "Z", 9)).await.is_err());
    }
}
