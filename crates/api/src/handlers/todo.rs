//! Handlers for the `/todos` resource.

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use taskboard_core::error::{CoreError, FieldErrors};
use taskboard_core::pagination::PageRequest;
use taskboard_core::stats::TaskStats;
use taskboard_core::task::{SortKey, SortOrder, TaskPriority, TaskStatus};
use taskboard_core::types::DbId;
use taskboard_core::validation;
use taskboard_db::models::category::SyncCategories;
use taskboard_db::models::task::{CreateTask, Task, TaskListParams, TaskWithCategories, UpdateTask};
use taskboard_db::repositories::{CategoryRepo, TaskRepo};
use taskboard_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for task listing and search.
///
/// Raw strings here; parsing into domain types happens in
/// [`parse_list_params`] so bad values surface as per-field validation
/// errors instead of opaque deserialization failures.
/// All fields stay `String` so this can sit behind `#[serde(flatten)]`,
/// which query-string deserialization only supports for string targets.
#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Query parameters for `/todos/search`: the free-text `q` plus the same
/// filters as the plain listing.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    #[serde(flatten)]
    pub filters: TaskQuery,
}

/// Body of `PATCH /todos/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: TaskStatus,
}

/// GET /api/todos
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TaskQuery>,
) -> AppResult<Json<ApiResponse<Vec<TaskWithCategories>>>> {
    let params = parse_list_params(&query)?;
    let (tasks, meta) = TaskRepo::list(&state.pool, &params).await?;
    tracing::info!(
        total = meta.total,
        page = meta.current_page,
        items = tasks.len(),
        "listed todos"
    );
    Ok(Json(ApiResponse::paginated(tasks, meta)))
}

/// GET /api/todos/search
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<Vec<TaskWithCategories>>>> {
    let params = parse_list_params(&query.filters)?;
    let q = query.q.as_deref().unwrap_or("");
    let (tasks, meta) = TaskRepo::search(&state.pool, q, &params).await?;
    tracing::info!(q, total = meta.total, "searched todos");
    Ok(Json(ApiResponse::paginated(tasks, meta)))
}

/// GET /api/todos/stats
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<ApiResponse<TaskStats>>> {
    let stats = TaskRepo::stats(&state.pool).await?;
    Ok(Json(ApiResponse::success(stats)))
}

/// GET /api/todos/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<TaskWithCategories>>> {
    let task = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;
    Ok(Json(ApiResponse::success(task)))
}

/// POST /api/todos
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<ApiResponse<TaskWithCategories>>)> {
    validation::validate_task_fields(
        &input.title,
        input.description.as_deref(),
        input.due_date,
        Some(Utc::now().date_naive()),
    )?;
    ensure_categories_exist(&state.pool, input.categories.as_deref()).await?;

    let task = TaskRepo::create(&state.pool, &input).await?;
    tracing::info!(task_id = task.task.id, "created todo");
    Ok((StatusCode::CREATED, Json(ApiResponse::success(task))))
}

/// PUT /api/todos/{id}
///
/// The due-date floor is deliberately not re-checked on update; only
/// creation rejects past dates.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<ApiResponse<TaskWithCategories>>> {
    validation::validate_task_fields(&input.title, input.description.as_deref(), None, None)?;
    ensure_categories_exist(&state.pool, input.categories.as_deref()).await?;

    let task = TaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;
    Ok(Json(ApiResponse::success(task)))
}

/// PATCH /api/todos/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateStatusBody>,
) -> AppResult<Json<ApiResponse<Task>>> {
    let task = TaskRepo::update_status(&state.pool, id, body.status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;
    Ok(Json(ApiResponse::success(task)))
}

/// DELETE /api/todos/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = TaskRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Task", id }))
    }
}

/// POST /api/todos/{id}/categories
///
/// Replaces the task's whole category set. An empty list clears it.
pub async fn sync_categories(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<SyncCategories>,
) -> AppResult<Json<ApiResponse<TaskWithCategories>>> {
    ensure_categories_exist(&state.pool, Some(&body.categories)).await?;

    let task = TaskRepo::sync_categories(&state.pool, id, &body.categories)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;
    Ok(Json(ApiResponse::with_message(
        task,
        "Categories updated successfully",
    )))
}

// ── Private helpers ──────────────────────────────────────────────────────

/// Fail with `NotFound` if any referenced category id is not a live row.
pub(crate) async fn ensure_categories_exist(
    pool: &DbPool,
    ids: Option<&[DbId]>,
) -> AppResult<()> {
    let Some(ids) = ids else { return Ok(()) };
    if ids.is_empty() {
        return Ok(());
    }
    let missing = CategoryRepo::find_missing(pool, ids).await?;
    match missing.first() {
        None => Ok(()),
        Some(&id) => Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        })),
    }
}

/// Parse raw listing parameters into typed ones, collecting every bad
/// field into one validation error.
fn parse_list_params(query: &TaskQuery) -> Result<TaskListParams, CoreError> {
    let mut errors = FieldErrors::new();

    let status = parse_filter::<TaskStatus>(query.status.as_deref(), "status", &mut errors);
    let priority = parse_filter::<TaskPriority>(query.priority.as_deref(), "priority", &mut errors);
    let sort = parse_filter::<SortKey>(query.sort.as_deref(), "sort", &mut errors).unwrap_or_default();
    let order =
        parse_filter::<SortOrder>(query.order.as_deref(), "order", &mut errors).unwrap_or_default();
    let page_raw = parse_int(query.page.as_deref(), "page", &mut errors);
    let limit_raw = parse_int(query.limit.as_deref(), "limit", &mut errors);
    let page = PageRequest::collect(page_raw, limit_raw, &mut errors);

    errors.into_result()?;
    Ok(TaskListParams {
        status,
        priority,
        sort,
        order,
        page,
    })
}

/// Parse an optional integer parameter, recording a failure against `field`.
fn parse_int(raw: Option<&str>, field: &str, errors: &mut FieldErrors) -> Option<i64> {
    match raw {
        None => None,
        Some(s) => match s.parse::<i64>() {
            Ok(value) => Some(value),
            Err(_) => {
                errors.push(field, "must be a positive integer");
                None
            }
        },
    }
}

/// Parse an optional raw parameter, recording a failure against `field`.
fn parse_filter<T: FromStr<Err = String>>(
    raw: Option<&str>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<T> {
    match raw {
        None => None,
        Some(s) => match s.parse::<T>() {
            Ok(value) => Some(value),
            Err(message) => {
                errors.push(field, message);
                None
            }
        },
    }
}
