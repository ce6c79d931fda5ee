//! CodeCoach submission proxy.
//!
//! This crate hosts the thin front-end facing proxy: it looks up problems
//! in the problem catalog, attaches their test cases, and relays submissions
//! to the evaluation engine (the `evalcore` binary in this workspace).
//!
//! # Architecture
//!
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic
//! - **Clients**: HTTP clients for the two upstream services
//! - **Models**: DTOs for the problem catalog's responses

pub mod clients;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
