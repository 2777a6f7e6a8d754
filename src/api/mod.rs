//! HTTP API: router, request accounting, handlers and envelopes.

pub mod articles;
pub mod handlers;
pub mod openapi;
pub mod response;
pub mod routes;

pub use handlers::AppState;
pub use response::ApiError;
pub use routes::{create_router, serve};
