//! Submission handlers

mod handler;
pub mod request;
pub mod response;

use axum::{routing::post, Router};

use crate::state::AppState;

/// Submission routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/submissions", post(handler::submit_problem))
        .route("/submissions/scratch", post(handler::scratch_run))
}
