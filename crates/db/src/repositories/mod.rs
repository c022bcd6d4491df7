//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Mutations that touch both
//! an entity row and the association table run inside a transaction.

pub mod category_repo;
pub mod task_repo;

pub use category_repo::CategoryRepo;
pub use task_repo::TaskRepo;
