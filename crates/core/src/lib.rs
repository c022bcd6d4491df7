//! Domain layer: entity enums, validation rules, pagination math, and the
//! error taxonomy shared by the persistence and HTTP crates. No I/O here.

pub mod error;
pub mod pagination;
pub mod stats;
pub mod task;
pub mod types;
pub mod validation;
