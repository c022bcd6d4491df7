//! Handlers for the `/categories` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use taskboard_core::error::CoreError;
use taskboard_core::types::DbId;
use taskboard_core::validation;
use taskboard_db::models::category::{
    Category, CategoryWithCount, CreateCategory, UpdateCategory,
};
use taskboard_db::models::task::TaskWithCategories;
use taskboard_db::repositories::{CategoryRepo, TaskRepo};

use crate::error::{AppError, AppResult};
use crate::response::ApiResponse;
use crate::state::AppState;

/// A category with its live tasks embedded, for the detail endpoint.
#[derive(Debug, Serialize)]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: Category,
    pub todos: Vec<TaskWithCategories>,
}

/// GET /api/categories
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<CategoryWithCount>>>> {
    let categories = CategoryRepo::list_with_counts(&state.pool).await?;
    Ok(Json(ApiResponse::success(categories)))
}

/// GET /api/categories/{id}
///
/// Returns the category with its live tasks, newest first.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<CategoryDetail>>> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    let todos = TaskRepo::list_for_category(&state.pool, id).await?;
    Ok(Json(ApiResponse::success(CategoryDetail { category, todos })))
}

/// GET /api/categories/{id}/todos
pub async fn todos(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<TaskWithCategories>>>> {
    CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    let todos = TaskRepo::list_for_category(&state.pool, id).await?;
    Ok(Json(ApiResponse::success(todos)))
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    validation::validate_category_fields(&input.name, &input.color, input.description.as_deref())?;
    if CategoryRepo::name_exists(&state.pool, &input.name, None).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "A category named `{}` already exists",
            input.name
        ))));
    }

    let category = CategoryRepo::create(&state.pool, &input).await?;
    tracing::info!(category_id = category.id, "created category");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            category,
            "Category created successfully",
        )),
    ))
}

/// PUT /api/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<Json<ApiResponse<Category>>> {
    validation::validate_category_fields(&input.name, &input.color, input.description.as_deref())?;
    // The uniqueness check excludes the row being updated, so keeping the
    // current name is always allowed.
    if CategoryRepo::name_exists(&state.pool, &input.name, Some(id)).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "A category named `{}` already exists",
            input.name
        ))));
    }

    let category = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    Ok(Json(ApiResponse::with_message(
        category,
        "Category updated successfully",
    )))
}

/// DELETE /api/categories/{id}
///
/// Soft-deletes the category and detaches it from every task; the tasks
/// themselves are untouched.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    let deleted = CategoryRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        Ok(Json(ApiResponse::with_message(
            (),
            "Category deleted successfully",
        )))
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))
    }
}
