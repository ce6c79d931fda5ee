//! The Evaluation Endpoint: `POST /evaluate` and `GET /health`.

use std::collections::HashSet;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use judge_common::{CoreError, SubmissionRequest};
use serde::Serialize;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/evaluate", post(evaluate))
        .route("/health", get(health))
}

/// Wraps [`CoreError`] to give it an `IntoResponse` impl local to this
/// binary's axum surface, without pulling axum into `judge-common`.
struct ApiError(CoreError);

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetails,
}

#[derive(Serialize)]
struct ErrorDetails {
    code: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            error: ErrorDetails {
                code: self.0.error_code().to_string(),
                message: self.0.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Reject a request whose test ids aren't unique before any workspace is
/// created for it.
fn validate_request(request: &SubmissionRequest) -> Result<(), CoreError> {
    let mut seen = HashSet::with_capacity(request.test_cases.len());
    for test_case in &request.test_cases {
        if !seen.insert(test_case.id.as_str()) {
            return Err(CoreError::Validation(format!(
                "duplicate test id: {}",
                test_case.id
            )));
        }
    }
    Ok(())
}

/// Run a submission end to end and return its [`EvaluationResultWire`] as
/// JSON. A well-formed request always returns `200 OK` even when the
/// outcome is `CompilationError` or `PartialAccepted` — those are judging
/// outcomes, not transport failures. A request that fails validation (e.g.
/// non-unique test ids) is rejected with a 4xx before any workspace is
/// created.
async fn evaluate(
    State(state): State<AppState>,
    Json(request): Json<SubmissionRequest>,
) -> Result<Json<judge_common::EvaluationResultWire>, ApiError> {
    let submission_id = request.submission_id.clone();
    tracing::info!(submission_id, "evaluating submission");

    validate_request(&request).map_err(ApiError)?;

    let result = crate::service::evaluate(request, state.config(), state.registry()).await;
    Ok(Json(result))
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_returns_ok() {
        let state = AppState::for_test();
        let app = routes().with_state(state);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn duplicate_test_ids_are_rejected_before_evaluation() {
        let state = AppState::for_test();
        let app = routes().with_state(state);

        let body = serde_json::json!({
            "submission_id": "dup-ids",
            "problem_id": "sum-two-numbers",
            "language": "cpp",
            "source_code": "int main() { return 0; }",
            "time_limit_ms": 2000,
            "memory_limit_kb": 262_144,
            "test_cases": [
                {"id": "1", "input": "1\n", "expected_output": "1\n"},
                {"id": "1", "input": "2\n", "expected_output": "2\n"},
            ],
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/evaluate")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
