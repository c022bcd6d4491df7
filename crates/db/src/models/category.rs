//! Category entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskboard_core::types::{DbId, Timestamp};

/// A category row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub color: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A category plus the number of live tasks tagged with it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryWithCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub category: Category,
    pub todos_count: i64,
}

/// DTO for creating a new category. An omitted color gets the default
/// swatch.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    pub description: Option<String>,
}

fn default_color() -> String {
    "#3B82F6".to_string()
}

/// DTO for updating a category. Name and color are required on update as
/// well; an absent description keeps the prior value.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCategory {
    pub name: String,
    pub color: String,
    pub description: Option<String>,
}

/// DTO for replacing a task's full category set.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncCategories {
    pub categories: Vec<DbId>,
}
