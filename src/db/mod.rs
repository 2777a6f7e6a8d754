//! SQLite storage: per-call connection accessor and start-up bootstrap.

pub mod schema;
pub mod storage;

pub use schema::{bootstrap, DEMO_ARTICLES};
pub use storage::Storage;
