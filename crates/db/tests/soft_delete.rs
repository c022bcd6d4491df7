//! Integration tests for soft-delete behaviour.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Soft-deleted tasks are hidden from `find_by_id`, listing, search,
//!   and statistics
//! - Soft-deleting a category detaches it from tasks without touching them
//! - Soft-delete is idempotent (second call returns `false`)

use sqlx::PgPool;
use taskboard_db::models::category::CreateCategory;
use taskboard_db::models::task::{CreateTask, TaskListParams};
use taskboard_db::repositories::{CategoryRepo, TaskRepo};

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

fn new_category(name: &str) -> CreateCategory {
    CreateCategory {
        name: name.to_string(),
        color: "#3B82F6".to_string(),
        description: None,
    }
}

// ---------------------------------------------------------------------------
// Test: soft_delete hides task from every read path
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_hides_task_everywhere(pool: PgPool) {
    let task = TaskRepo::create(&pool, &new_task("Vanishing act"))
        .await
        .unwrap();

    let deleted = TaskRepo::soft_delete(&pool, task.task.id).await.unwrap();
    assert!(deleted, "soft_delete should return true on first call");

    let found = TaskRepo::find_by_id(&pool, task.task.id).await.unwrap();
    assert!(found.is_none(), "find_by_id should hide soft-deleted task");

    let (tasks, meta) = TaskRepo::list(&pool, &TaskListParams::default())
        .await
        .unwrap();
    assert!(tasks.is_empty(), "list should hide soft-deleted task");
    assert_eq!(meta.total, 0);

    let (_, meta) = TaskRepo::search(&pool, "vanishing", &TaskListParams::default())
        .await
        .unwrap();
    assert_eq!(meta.total, 0, "search should hide soft-deleted task");

    let stats = TaskRepo::stats(&pool).await.unwrap();
    assert_eq!(stats.total(), 0, "stats should not count soft-deleted task");
}

// ---------------------------------------------------------------------------
// Test: soft_delete is idempotent on already-deleted task
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_idempotent(pool: PgPool) {
    let task = TaskRepo::create(&pool, &new_task("Delete twice"))
        .await
        .unwrap();

    let first = TaskRepo::soft_delete(&pool, task.task.id).await.unwrap();
    assert!(first, "first soft_delete should return true");

    let second = TaskRepo::soft_delete(&pool, task.task.id).await.unwrap();
    assert!(!second, "second soft_delete should return false");
}

// ---------------------------------------------------------------------------
// Test: deleting a category detaches it from tasks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_delete_detaches_from_tasks(pool: PgPool) {
    let category = CategoryRepo::create(&pool, &new_category("Doomed"))
        .await
        .unwrap();
    let task = TaskRepo::create(
        &pool,
        &CreateTask {
            categories: Some(vec![category.id]),
            ..new_task("Survivor")
        },
    )
    .await
    .unwrap();
    assert_eq!(task.categories.len(), 1);

    let deleted = CategoryRepo::soft_delete(&pool, category.id).await.unwrap();
    assert!(deleted);

    // The task survives, just without the category.
    let task = TaskRepo::find_by_id(&pool, task.task.id)
        .await
        .unwrap()
        .expect("task should still be live");
    assert!(task.categories.is_empty());

    let found = CategoryRepo::find_by_id(&pool, category.id).await.unwrap();
    assert!(found.is_none(), "category should be hidden after delete");
}

// ---------------------------------------------------------------------------
// Test: deleted category's name is free for reuse
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_category_name_is_reusable(pool: PgPool) {
    let original = CategoryRepo::create(&pool, &new_category("Recycled"))
        .await
        .unwrap();
    CategoryRepo::soft_delete(&pool, original.id).await.unwrap();

    assert!(
        !CategoryRepo::name_exists(&pool, "Recycled", None)
            .await
            .unwrap(),
        "deleted category should not block its name"
    );

    // The partial unique index only covers live rows, so this insert works.
    let replacement = CategoryRepo::create(&pool, &new_category("Recycled"))
        .await
        .unwrap();
    assert_ne!(replacement.id, original.id);
}
