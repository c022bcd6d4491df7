//! Task enums and the list-query vocabulary (sort keys and direction).

use serde::{Deserialize, Serialize};

/// Workflow state of a task.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(format!(
                "invalid status `{other}`; expected pending, in_progress or completed"
            )),
        }
    }
}

/// Urgency of a task.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(format!(
                "invalid priority `{other}`; expected low, medium or high"
            )),
        }
    }
}

/// Whitelisted sort columns for task listings.
///
/// Anything outside this set is rejected rather than silently ignored, so a
/// typo in a `sort` parameter surfaces as a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Id,
    Title,
    Status,
    Priority,
    DueDate,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortKey {
    /// The SQL column this key sorts on. Always a static identifier, never
    /// user input, so it is safe to splice into a query string.
    pub fn column(self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Title => "title",
            SortKey::Status => "status",
            SortKey::Priority => "priority",
            SortKey::DueDate => "due_date",
            SortKey::CreatedAt => "created_at",
            SortKey::UpdatedAt => "updated_at",
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortKey::Id),
            "title" => Ok(SortKey::Title),
            "status" => Ok(SortKey::Status),
            "priority" => Ok(SortKey::Priority),
            "due_date" => Ok(SortKey::DueDate),
            "created_at" => Ok(SortKey::CreatedAt),
            "updated_at" => Ok(SortKey::UpdatedAt),
            other => Err(format!(
                "unknown sort field `{other}`; expected one of id, title, status, \
                 priority, due_date, created_at, updated_at"
            )),
        }
    }
}

/// Sort direction. Defaults to newest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortOrder::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Err(format!("invalid order `{s}`; expected asc or desc"))
        }
    }
}
