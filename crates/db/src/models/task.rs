//! Task entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskboard_core::pagination::PageRequest;
use taskboard_core::task::{SortKey, SortOrder, TaskPriority, TaskStatus};
use taskboard_core::types::{DbId, Timestamp};

use crate::models::category::Category;

/// A task row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A task together with its live categories, as returned by every read path.
#[derive(Debug, Clone, Serialize)]
pub struct TaskWithCategories {
    #[serde(flatten)]
    pub task: Task,
    pub categories: Vec<Category>,
}

/// DTO for creating a new task.
///
/// A missing `categories` key and an empty list are equivalent here: both
/// leave the task uncategorized.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `pending` if omitted.
    pub status: Option<TaskStatus>,
    /// Defaults to `medium` if omitted.
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
    pub categories: Option<Vec<DbId>>,
}

/// DTO for updating an existing task.
///
/// `title` is always required; other absent fields keep their prior values.
/// A present `categories` key, even an empty list, replaces the whole
/// association set; an absent key leaves it untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTask {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
    pub categories: Option<Vec<DbId>>,
}

/// Validated parameters for task listing and search.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskListParams {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub sort: SortKey,
    pub order: SortOrder,
    pub page: PageRequest,
}
