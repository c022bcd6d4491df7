//! Repository for the `tasks` table and its category associations.
//!
//! Implements the listing, search, mutation, and statistics operations.
//! Soft-deleted rows are filtered by the shared `FILTER` clause; every read
//! path goes through it so a deleted task can never leak into a result set.

use sqlx::{FromRow, PgConnection, PgPool};
use taskboard_core::pagination::PageMeta;
use taskboard_core::stats::TaskStats;
use taskboard_core::task::TaskStatus;
use taskboard_core::types::DbId;

use crate::models::category::Category;
use crate::models::task::{CreateTask, Task, TaskListParams, TaskWithCategories, UpdateTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, status, priority, due_date, created_at, updated_at";

/// Same columns qualified for joins against the `tasks t` alias.
const QUALIFIED_COLUMNS: &str = "t.id, t.title, t.description, t.status, t.priority, t.due_date, \
     t.created_at, t.updated_at";

/// Soft-delete guard plus the two optional equality filters.
///
/// `$1` is the status filter and `$2` the priority filter; a NULL bind
/// disables the corresponding predicate.
const FILTER: &str = "deleted_at IS NULL \
     AND ($1::text IS NULL OR status = $1) \
     AND ($2::text IS NULL OR priority = $2)";

/// A category row tagged with the task it belongs to, for batch attachment.
#[derive(FromRow)]
struct TaskCategoryRow {
    task_id: DbId,
    #[sqlx(flatten)]
    category: Category,
}

/// Provides CRUD, listing, search, and statistics for tasks.
pub struct TaskRepo;

impl TaskRepo {
    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Find a live task by ID with its categories attached.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TaskWithCategories>, sqlx::Error> {
        let Some(task) = Self::find_row(pool, id).await? else {
            return Ok(None);
        };
        let categories = Self::categories_for(pool, id).await?;
        Ok(Some(TaskWithCategories { task, categories }))
    }

    /// List live tasks with optional status/priority filters, sorted and
    /// paginated. Returns the page plus its pagination metadata.
    ///
    /// A page past the end of the result set is clamped to the last page.
    pub async fn list(
        pool: &PgPool,
        params: &TaskListParams,
    ) -> Result<(Vec<TaskWithCategories>, PageMeta), sqlx::Error> {
        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM tasks WHERE {FILTER}"))
            .bind(params.status)
            .bind(params.priority)
            .fetch_one(pool)
            .await?;
        let meta = PageMeta::compute(total, params.page);

        // `id` as a tie-breaker makes the ordering total, so consecutive
        // pages never overlap or skip rows.
        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE {FILTER} \
             ORDER BY {sort} {dir}, id {dir} LIMIT $3 OFFSET $4",
            sort = params.sort.column(),
            dir = params.order.sql(),
        );
        let rows = sqlx::query_as::<_, Task>(&query)
            .bind(params.status)
            .bind(params.priority)
            .bind(meta.per_page)
            .bind(meta.offset())
            .fetch_all(pool)
            .await?;

        tracing::debug!(total, page = meta.current_page, "listed tasks");
        let tasks = Self::attach_categories(pool, rows).await?;
        Ok((tasks, meta))
    }

    /// Search live tasks whose title or description contains `q`,
    /// case-insensitively, composed with the same filters and pagination
    /// as [`TaskRepo::list`]. An empty `q` matches everything.
    pub async fn search(
        pool: &PgPool,
        q: &str,
        params: &TaskListParams,
    ) -> Result<(Vec<TaskWithCategories>, PageMeta), sqlx::Error> {
        let pattern = format!("%{}%", escape_like(q));
        let matcher = "(title ILIKE $3 ESCAPE '\\' \
             OR COALESCE(description, '') ILIKE $3 ESCAPE '\\')";

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM tasks WHERE {FILTER} AND {matcher}"
        ))
        .bind(params.status)
        .bind(params.priority)
        .bind(&pattern)
        .fetch_one(pool)
        .await?;
        let meta = PageMeta::compute(total, params.page);

        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE {FILTER} AND {matcher} \
             ORDER BY {sort} {dir}, id {dir} LIMIT $4 OFFSET $5",
            sort = params.sort.column(),
            dir = params.order.sql(),
        );
        let rows = sqlx::query_as::<_, Task>(&query)
            .bind(params.status)
            .bind(params.priority)
            .bind(&pattern)
            .bind(meta.per_page)
            .bind(meta.offset())
            .fetch_all(pool)
            .await?;

        tracing::debug!(q, total, "searched tasks");
        let tasks = Self::attach_categories(pool, rows).await?;
        Ok((tasks, meta))
    }

    /// List the live tasks tagged with a category, newest first.
    pub async fn list_for_category(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Vec<TaskWithCategories>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED_COLUMNS} FROM tasks t \
             JOIN category_task ct ON ct.task_id = t.id \
             WHERE ct.category_id = $1 AND t.deleted_at IS NULL \
             ORDER BY t.created_at DESC, t.id DESC"
        );
        let rows = sqlx::query_as::<_, Task>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await?;
        Self::attach_categories(pool, rows).await
    }

    /// Count live tasks per status and per priority. Buckets with no tasks
    /// report zero.
    pub async fn stats(pool: &PgPool) -> Result<TaskStats, sqlx::Error> {
        let mut stats = TaskStats::default();

        let by_status: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM tasks WHERE deleted_at IS NULL GROUP BY status",
        )
        .fetch_all(pool)
        .await?;
        for (status, count) in by_status {
            match status.as_str() {
                "pending" => stats.status_counts.pending = count,
                "in_progress" => stats.status_counts.in_progress = count,
                "completed" => stats.status_counts.completed = count,
                _ => {}
            }
        }

        let by_priority: Vec<(String, i64)> = sqlx::query_as(
            "SELECT priority, COUNT(*) FROM tasks WHERE deleted_at IS NULL GROUP BY priority",
        )
        .fetch_all(pool)
        .await?;
        for (priority, count) in by_priority {
            match priority.as_str() {
                "low" => stats.priority_counts.low = count,
                "medium" => stats.priority_counts.medium = count,
                "high" => stats.priority_counts.high = count,
                _ => {}
            }
        }

        Ok(stats)
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Insert a new task and, in the same transaction, its category
    /// associations. Returns the created task with categories attached.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTask,
    ) -> Result<TaskWithCategories, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO tasks (title, description, status, priority, due_date) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.unwrap_or_default())
            .bind(input.priority.unwrap_or_default())
            .bind(input.due_date)
            .fetch_one(tx.as_mut())
            .await?;

        if let Some(ids) = &input.categories {
            replace_categories(tx.as_mut(), task.id, ids).await?;
        }
        tx.commit().await?;

        let categories = Self::categories_for(pool, task.id).await?;
        Ok(TaskWithCategories { task, categories })
    }

    /// Update a live task. Absent optional fields keep their prior values;
    /// a present `categories` key replaces the whole association set in the
    /// same transaction.
    ///
    /// Returns `None` if no live task with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<TaskWithCategories>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE tasks SET \
                 title = $2, \
                 description = COALESCE($3, description), \
                 status = COALESCE($4, status), \
                 priority = COALESCE($5, priority), \
                 due_date = COALESCE($6, due_date), \
                 updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        let Some(task) = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status)
            .bind(input.priority)
            .bind(input.due_date)
            .fetch_optional(tx.as_mut())
            .await?
        else {
            return Ok(None);
        };

        if let Some(ids) = &input.categories {
            replace_categories(tx.as_mut(), id, ids).await?;
        }
        tx.commit().await?;

        let categories = Self::categories_for(pool, id).await?;
        Ok(Some(TaskWithCategories { task, categories }))
    }

    /// Update only the status of a live task.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: TaskStatus,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET status = $2, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a task and remove its association rows atomically.
    /// Returns `true` if a live row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result =
            sqlx::query("UPDATE tasks SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(tx.as_mut())
                .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM category_task WHERE task_id = $1")
            .bind(id)
            .execute(tx.as_mut())
            .await?;
        tx.commit().await?;
        Ok(true)
    }

    /// Replace a live task's full category set. Idempotent; duplicate ids
    /// collapse to a single association.
    ///
    /// Returns `None` if no live task with the given `id` exists.
    pub async fn sync_categories(
        pool: &PgPool,
        id: DbId,
        category_ids: &[DbId],
    ) -> Result<Option<TaskWithCategories>, sqlx::Error> {
        let Some(task) = Self::find_row(pool, id).await? else {
            return Ok(None);
        };

        let mut tx = pool.begin().await?;
        replace_categories(tx.as_mut(), id, category_ids).await?;
        tx.commit().await?;

        let categories = Self::categories_for(pool, id).await?;
        Ok(Some(TaskWithCategories { task, categories }))
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Fetch a bare live task row.
    async fn find_row(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Live categories for one task, sorted by name.
    async fn categories_for(pool: &PgPool, task_id: DbId) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "SELECT c.id, c.name, c.color, c.description, c.created_at, c.updated_at \
             FROM category_task ct \
             JOIN categories c ON c.id = ct.category_id \
             WHERE ct.task_id = $1 AND c.deleted_at IS NULL \
             ORDER BY c.name",
        )
        .bind(task_id)
        .fetch_all(pool)
        .await
    }

    /// Attach categories to a batch of task rows with a single join query.
    async fn attach_categories(
        pool: &PgPool,
        rows: Vec<Task>,
    ) -> Result<Vec<TaskWithCategories>, sqlx::Error> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let task_ids: Vec<DbId> = rows.iter().map(|t| t.id).collect();
        let links = sqlx::query_as::<_, TaskCategoryRow>(
            "SELECT ct.task_id, c.id, c.name, c.color, c.description, c.created_at, c.updated_at \
             FROM category_task ct \
             JOIN categories c ON c.id = ct.category_id \
             WHERE ct.task_id = ANY($1) AND c.deleted_at IS NULL \
             ORDER BY c.name",
        )
        .bind(&task_ids)
        .fetch_all(pool)
        .await?;

        let mut by_task: std::collections::HashMap<DbId, Vec<Category>> =
            std::collections::HashMap::new();
        for link in links {
            by_task.entry(link.task_id).or_default().push(link.category);
        }

        Ok(rows
            .into_iter()
            .map(|task| {
                let categories = by_task.remove(&task.id).unwrap_or_default();
                TaskWithCategories { task, categories }
            })
            .collect())
    }
}

/// Delete all association rows for a task and insert the new set.
///
/// Runs on a transaction connection so a failure rolls back both halves.
async fn replace_categories(
    conn: &mut PgConnection,
    task_id: DbId,
    category_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM category_task WHERE task_id = $1")
        .bind(task_id)
        .execute(&mut *conn)
        .await?;

    if !category_ids.is_empty() {
        sqlx::query(
            "INSERT INTO category_task (category_id, task_id) \
             SELECT DISTINCT u.cid, $1 FROM UNNEST($2::bigint[]) AS u(cid) \
             ON CONFLICT (category_id, task_id) DO NOTHING",
        )
        .bind(task_id)
        .bind(category_ids)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Escape LIKE wildcards so user input matches as a literal substring.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escape_like_passes_plain_text_through() {
        assert_eq!(escape_like("market"), "market");
    }

    #[test]
    fn escape_like_escapes_wildcards_and_backslash() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\temp"), "c:\\\\temp");
    }
}
