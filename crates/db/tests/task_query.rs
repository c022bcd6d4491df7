//! Integration tests for task listing: filters, sorting, and pagination.
//!
//! Exercises `TaskRepo::list` against a real database to verify that:
//! - Status and priority filters return exactly the matching rows
//! - Filters compose with AND semantics
//! - Sorting honors the requested key and direction with a stable tie-break
//! - Pagination metadata is consistent and pages concatenate without
//!   overlap or gaps

use sqlx::PgPool;
use taskboard_core::pagination::PageRequest;
use taskboard_core::task::{SortKey, SortOrder, TaskPriority, TaskStatus};
use taskboard_db::models::task::{CreateTask, TaskListParams};
use taskboard_db::repositories::TaskRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_task(title: &str) -> CreateTask {
    CreateTask {
        title: title.to_string(),
        description: None,
        status: None,
        priority: None,
        due_date: None,
        categories: None,
    }
}

fn new_task_with(title: &str, status: TaskStatus, priority: TaskPriority) -> CreateTask {
    CreateTask {
        status: Some(status),
        priority: Some(priority),
        ..new_task(title)
    }
}

fn params_with_page(page: i64, per_page: i64) -> TaskListParams {
    TaskListParams {
        page: PageRequest { page, per_page },
        ..TaskListParams::default()
    }
}

// ---------------------------------------------------------------------------
// Test: status filter returns exactly the matching rows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_filter_returns_only_matching(pool: PgPool) {
    TaskRepo::create(
        &pool,
        &new_task_with("Pending A", TaskStatus::Pending, TaskPriority::Medium),
    )
    .await
    .unwrap();
    TaskRepo::create(
        &pool,
        &new_task_with("Done B", TaskStatus::Completed, TaskPriority::Medium),
    )
    .await
    .unwrap();
    TaskRepo::create(
        &pool,
        &new_task_with("Done C", TaskStatus::Completed, TaskPriority::High),
    )
    .await
    .unwrap();

    let params = TaskListParams {
        status: Some(TaskStatus::Completed),
        ..TaskListParams::default()
    };
    let (tasks, meta) = TaskRepo::list(&pool, &params).await.unwrap();

    assert_eq!(meta.total, 2);
    assert!(tasks.iter().all(|t| t.task.status == TaskStatus::Completed));
}

// ---------------------------------------------------------------------------
// Test: status and priority filters compose with AND
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_filters_compose_with_and(pool: PgPool) {
    TaskRepo::create(
        &pool,
        &new_task_with("Match", TaskStatus::Pending, TaskPriority::High),
    )
    .await
    .unwrap();
    TaskRepo::create(
        &pool,
        &new_task_with("Wrong priority", TaskStatus::Pending, TaskPriority::Low),
    )
    .await
    .unwrap();
    TaskRepo::create(
        &pool,
        &new_task_with("Wrong status", TaskStatus::Completed, TaskPriority::High),
    )
    .await
    .unwrap();

    let params = TaskListParams {
        status: Some(TaskStatus::Pending),
        priority: Some(TaskPriority::High),
        ..TaskListParams::default()
    };
    let (tasks, meta) = TaskRepo::list(&pool, &params).await.unwrap();

    assert_eq!(meta.total, 1);
    assert_eq!(tasks[0].task.title, "Match");
}

// ---------------------------------------------------------------------------
// Test: no filters returns every live task
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_no_filters_returns_all(pool: PgPool) {
    for i in 0..3 {
        TaskRepo::create(&pool, &new_task(&format!("Task {i}")))
            .await
            .unwrap();
    }

    let (tasks, meta) = TaskRepo::list(&pool, &TaskListParams::default())
        .await
        .unwrap();
    assert_eq!(meta.total, 3);
    assert_eq!(tasks.len(), 3);
}

// ---------------------------------------------------------------------------
// Test: sort by title ascending
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sort_by_title_ascending(pool: PgPool) {
    for title in ["Banana", "Apple", "Cherry"] {
        TaskRepo::create(&pool, &new_task(title)).await.unwrap();
    }

    let params = TaskListParams {
        sort: SortKey::Title,
        order: SortOrder::Asc,
        ..TaskListParams::default()
    };
    let (tasks, _) = TaskRepo::list(&pool, &params).await.unwrap();

    let titles: Vec<_> = tasks.iter().map(|t| t.task.title.as_str()).collect();
    assert_eq!(titles, vec!["Apple", "Banana", "Cherry"]);
}

// ---------------------------------------------------------------------------
// Test: default order is newest first
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_default_order_is_newest_first(pool: PgPool) {
    let first = TaskRepo::create(&pool, &new_task("Older")).await.unwrap();
    let second = TaskRepo::create(&pool, &new_task("Newer")).await.unwrap();

    let (tasks, _) = TaskRepo::list(&pool, &TaskListParams::default())
        .await
        .unwrap();

    // Rows created in the same instant fall back to the id tie-break, which
    // follows the same direction, so the later insert always comes first.
    assert_eq!(tasks[0].task.id, second.task.id);
    assert_eq!(tasks[1].task.id, first.task.id);
}

// ---------------------------------------------------------------------------
// Test: pagination metadata and page concatenation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pagination_pages_concatenate_without_gaps(pool: PgPool) {
    for i in 0..13 {
        TaskRepo::create(&pool, &new_task(&format!("Task {i:02}")))
            .await
            .unwrap();
    }

    let mut seen = Vec::new();
    for page in 1..=3 {
        let (tasks, meta) = TaskRepo::list(&pool, &params_with_page(page, 5))
            .await
            .unwrap();
        assert_eq!(meta.total, 13);
        assert_eq!(meta.last_page, 3);
        assert_eq!(meta.current_page, page);
        seen.extend(tasks.into_iter().map(|t| t.task.id));
    }

    assert_eq!(seen.len(), 13, "pages should cover every row exactly once");
    let mut deduped = seen.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(deduped.len(), 13, "pages should not overlap");
}

// ---------------------------------------------------------------------------
// Test: page beyond the end clamps to the last page
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_page_beyond_end_clamps_to_last(pool: PgPool) {
    for i in 0..7 {
        TaskRepo::create(&pool, &new_task(&format!("Task {i}")))
            .await
            .unwrap();
    }

    let (tasks, meta) = TaskRepo::list(&pool, &params_with_page(99, 5))
        .await
        .unwrap();

    assert_eq!(meta.current_page, 2);
    assert_eq!(meta.last_page, 2);
    assert_eq!(tasks.len(), 2);
    assert_eq!(meta.from, Some(6));
    assert_eq!(meta.to, Some(7));
}

// ---------------------------------------------------------------------------
// Test: empty table reports page 1 of 1 with null bounds
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_table_reports_empty_page(pool: PgPool) {
    let (tasks, meta) = TaskRepo::list(&pool, &TaskListParams::default())
        .await
        .unwrap();

    assert!(tasks.is_empty());
    assert_eq!(meta.total, 0);
    assert_eq!(meta.current_page, 1);
    assert_eq!(meta.last_page, 1);
    assert_eq!(meta.from, None);
    assert_eq!(meta.to, None);
}
