//! Blog articles REST API.
//!
//! A small CRUD service over a single SQLite table, with health and metrics
//! endpoints for operational monitoring.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`db`]: Per-call storage accessor and bootstrap
//! - [`articles`]: Article records and repository
//! - [`monitor`]: Uptime, request counter and CPU/memory sampling
//! - [`metrics`]: Prometheus instrumentation
//! - [`api`]: HTTP router, handlers and envelopes
//! - [`utils`]: Utility functions

pub mod api;
pub mod articles;
pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod monitor;
pub mod utils;

pub use config::Config;
pub use error::{BlogError, Result};
