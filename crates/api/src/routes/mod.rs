pub mod health;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{category, todo};
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /todos                       list (GET), create (POST)
/// /todos/search                free-text search (GET)
/// /todos/stats                 status/priority counts (GET)
/// /todos/{id}                  get, update (PUT), delete
/// /todos/{id}/status           update status only (PATCH)
/// /todos/{id}/categories       replace category set (POST)
///
/// /categories                  list with task counts (GET), create (POST)
/// /categories/{id}             get with tasks, update (PUT), delete
/// /categories/{id}/todos       the category's tasks (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/todos", get(todo::list).post(todo::create))
        .route("/todos/search", get(todo::search))
        .route("/todos/stats", get(todo::stats))
        .route(
            "/todos/{id}",
            get(todo::get_by_id).put(todo::update).delete(todo::delete),
        )
        .route("/todos/{id}/status", patch(todo::update_status))
        .route("/todos/{id}/categories", post(todo::sync_categories))
        .route("/categories", get(category::list).post(category::create))
        .route(
            "/categories/{id}",
            get(category::get_by_id)
                .put(category::update)
                .delete(category::delete),
        )
        .route("/categories/{id}/todos", get(category::todos))
}
