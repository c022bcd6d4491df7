//! Shared response envelope types for API handlers.
//!
//! Every success body is `{ "status": "success", "data": ... }`, with an
//! optional `message` for mutations and an optional `meta.pagination` block
//! for listings. Use these constructors instead of ad-hoc `json!` blocks.

use serde::Serialize;
use taskboard_core::pagination::PageMeta;

/// Standard success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// The `meta` block of a listing response.
#[derive(Debug, Serialize)]
pub struct Meta {
    pub pagination: PageMeta,
}

impl<T: Serialize> ApiResponse<T> {
    /// Plain `{status, data}` envelope.
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            message: None,
            data,
            meta: None,
        }
    }

    /// Envelope with a human-readable message, used by mutations.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: Some(message.into()),
            data,
            meta: None,
        }
    }

    /// Envelope with pagination metadata, used by listings.
    pub fn paginated(data: T, pagination: PageMeta) -> Self {
        Self {
            status: "success",
            message: None,
            data,
            meta: Some(Meta { pagination }),
        }
    }
}
