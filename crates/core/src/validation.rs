//! Field validation for task and category mutations.
//!
//! Violations are accumulated across fields so one response reports them
//! all, rather than failing on the first bad field.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{CoreError, FieldErrors};

/// Title length bounds in characters.
pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 100;

/// Maximum task description length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Maximum category name length in characters.
pub const CATEGORY_NAME_MAX_CHARS: usize = 255;

/// Maximum category description length in characters.
pub const CATEGORY_DESCRIPTION_MAX_CHARS: usize = 1000;

fn hex_color() -> &'static Regex {
    static HEX_COLOR: OnceLock<Regex> = OnceLock::new();
    HEX_COLOR.get_or_init(|| Regex::new("^#[A-Fa-f0-9]{6}$").expect("valid hex color pattern"))
}

/// Validate task fields for create and update.
///
/// `due_date_floor` is the earliest acceptable due date. Creation passes
/// today; update passes `None` because the floor is deliberately not
/// re-checked once a task exists.
pub fn validate_task_fields(
    title: &str,
    description: Option<&str>,
    due_date: Option<NaiveDate>,
    due_date_floor: Option<NaiveDate>,
) -> Result<(), CoreError> {
    let mut errors = FieldErrors::new();

    let title_len = title.chars().count();
    if title_len < TITLE_MIN_CHARS {
        errors.push(
            "title",
            format!("must be at least {TITLE_MIN_CHARS} characters"),
        );
    } else if title_len > TITLE_MAX_CHARS {
        errors.push(
            "title",
            format!("must be at most {TITLE_MAX_CHARS} characters"),
        );
    }

    if let Some(description) = description {
        if description.chars().count() > DESCRIPTION_MAX_CHARS {
            errors.push(
                "description",
                format!("must be at most {DESCRIPTION_MAX_CHARS} characters"),
            );
        }
    }

    if let (Some(due_date), Some(floor)) = (due_date, due_date_floor) {
        if due_date < floor {
            errors.push("due_date", "must be today or later");
        }
    }

    errors.into_result()
}

/// Validate category fields for create and update.
pub fn validate_category_fields(
    name: &str,
    color: &str,
    description: Option<&str>,
) -> Result<(), CoreError> {
    let mut errors = FieldErrors::new();

    if name.is_empty() {
        errors.push("name", "is required");
    } else if name.chars().count() > CATEGORY_NAME_MAX_CHARS {
        errors.push(
            "name",
            format!("must be at most {CATEGORY_NAME_MAX_CHARS} characters"),
        );
    }

    if !hex_color().is_match(color) {
        errors.push("color", "must be a hex color like #3B82F6");
    }

    if let Some(description) = description {
        if description.chars().count() > CATEGORY_DESCRIPTION_MAX_CHARS {
            errors.push(
                "description",
                format!("must be at most {CATEGORY_DESCRIPTION_MAX_CHARS} characters"),
            );
        }
    }

    errors.into_result()
}
