//! Row types and request DTOs for the repository layer.

pub mod category;
pub mod task;
