//! Repository for the `categories` table.

use sqlx::PgPool;
use taskboard_core::types::DbId;

use crate::models::category::{Category, CategoryWithCount, CreateCategory, UpdateCategory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, color, description, created_at, updated_at";

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, color, description) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(&input.color)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a live category by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM categories WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all live categories with their live-task counts, sorted by name.
    pub async fn list_with_counts(pool: &PgPool) -> Result<Vec<CategoryWithCount>, sqlx::Error> {
        sqlx::query_as::<_, CategoryWithCount>(
            "SELECT c.id, c.name, c.color, c.description, c.created_at, c.updated_at, \
                 COUNT(t.id) FILTER (WHERE t.deleted_at IS NULL) AS todos_count \
             FROM categories c \
             LEFT JOIN category_task ct ON ct.category_id = c.id \
             LEFT JOIN tasks t ON t.id = ct.task_id \
             WHERE c.deleted_at IS NULL \
             GROUP BY c.id \
             ORDER BY c.name",
        )
        .fetch_all(pool)
        .await
    }

    /// Whether a live category with this name exists, optionally excluding
    /// one row (the category being updated).
    pub async fn name_exists(
        pool: &PgPool,
        name: &str,
        exclude: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS ( \
                 SELECT 1 FROM categories \
                 WHERE name = $1 AND deleted_at IS NULL \
                 AND ($2::bigint IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude)
        .fetch_one(pool)
        .await
    }

    /// Which of the given ids do not refer to a live category.
    pub async fn find_missing(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT u.cid FROM UNNEST($1::bigint[]) AS u(cid) \
             WHERE NOT EXISTS ( \
                 SELECT 1 FROM categories c \
                 WHERE c.id = u.cid AND c.deleted_at IS NULL)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// Update a live category. Name and color are overwritten; an absent
    /// description keeps the prior value.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET \
                 name = $2, \
                 color = $3, \
                 description = COALESCE($4, description), \
                 updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.color)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a category and remove its association rows atomically.
    /// Tasks that carried the category are untouched. Returns `true` if a
    /// live row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE categories SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(tx.as_mut())
        .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM category_task WHERE category_id = $1")
            .bind(id)
            .execute(tx.as_mut())
            .await?;
        tx.commit().await?;
        Ok(true)
    }
}
