//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod health;
pub mod submit;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes() -> Router<AppState> {
    Router::new().merge(health::routes()).merge(submit::routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use judge_common::{EvaluationResultWire, OverallStatus, SubmissionRequest};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::clients::{EngineClient, ProblemCatalogClient};
    use crate::config::{Config, ServerConfig, UpstreamConfig};
    use crate::error::AppResult;
    use crate::models::Problem;

    struct NullEngine;

    #[async_trait]
    impl EngineClient for NullEngine {
        async fn evaluate(&self, request: SubmissionRequest) -> AppResult<EvaluationResultWire> {
            Ok(EvaluationResultWire {
                submission_id: request.submission_id,
                overall_status: OverallStatus::Accepted,
                compile_log: String::new(),
                max_time_ms: 0,
                max_memory_kb: 0,
                tests: vec![],
            })
        }
    }

    struct NullCatalog;

    #[async_trait]
    impl ProblemCatalogClient for NullCatalog {
        async fn get_problem(&self, _problem_id: &str) -> AppResult<Option<Problem>> {
            Ok(None)
        }
    }

    fn test_state() -> AppState {
        AppState::new(
            Arc::new(NullEngine),
            Arc::new(NullCatalog),
            Config {
                server: ServerConfig {
                    bind_addr: "0.0.0.0:0".to_string(),
                    rust_log: "info".to_string(),
                },
                upstream: UpstreamConfig {
                    engine_url: "http://localhost:8090".to_string(),
                    catalog_url: "http://localhost:8081".to_string(),
                    timeout_secs: 1,
                },
            },
        )
    }

    #[tokio::test]
    async fn health_route_is_reachable_through_the_full_router() {
        let app = routes().with_state(test_state());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
