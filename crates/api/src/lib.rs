//! HTTP layer: router, handlers, response envelope, and error mapping.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
