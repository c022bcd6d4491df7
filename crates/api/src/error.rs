use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use taskboard_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the project's `status: "error"`
/// JSON envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `taskboard_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    format!("{entity} with id {id} not found"),
                    None,
                ),
                CoreError::Validation(fields) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "The given data was invalid".to_string(),
                    Some(json!(fields)),
                ),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), None),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal error occurred".to_string(),
                        None,
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "status": "error",
            "message": message,
        });
        if let Some(errors) = errors {
            body["errors"] = errors;
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, message, and optional
/// per-field errors.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String, Option<serde_json::Value>) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "Resource not found".to_string(),
            None,
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        format!("Duplicate value violates unique constraint: {constraint}"),
                        None,
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_string(),
                None,
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_string(),
                None,
            )
        }
    }
}
