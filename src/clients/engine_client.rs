//! Client for the evaluation engine (`evalcore`'s `POST /evaluate`).

use async_trait::async_trait;
use judge_common::{EvaluationResultWire, SubmissionRequest};

use crate::error::{AppError, AppResult};

/// Abstraction over the evaluation engine call, so `ProxyService` can be
/// tested against a fake without a live engine.
#[async_trait]
pub trait EngineClient: Send + Sync {
    async fn evaluate(&self, request: SubmissionRequest) -> AppResult<EvaluationResultWire>;
}

/// `reqwest`-backed implementation. The response body is decoded and
/// re-encoded rather than streamed through byte-for-byte, but its shape is
/// exactly `EvaluationResultWire` — the proxy relays the engine's verdict
/// verbatim, it never edits it.
pub struct HttpEngineClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpEngineClient {
    pub fn new(base_url: String, timeout: std::time::Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build engine HTTP client");
        Self { http, base_url }
    }
}

#[async_trait]
impl EngineClient for HttpEngineClient {
    async fn evaluate(&self, request: SubmissionRequest) -> AppResult<EvaluationResultWire> {
        let url = format!("{}/evaluate", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("evaluation engine request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "evaluation engine returned {}",
                response.status()
            )));
        }

        response
            .json::<EvaluationResultWire>()
            .await
            .map_err(|e| AppError::Upstream(format!("invalid evaluation engine response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use judge_common::TestCaseWire;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_request() -> SubmissionRequest {
        SubmissionRequest {
            submission_id: "sub-1".to_string(),
            problem_id: "sum-two-numbers".to_string(),
            language: "cpp".to_string(),
            source_code: "int main(){}".to_string(),
            time_limit_ms: 2000,
            memory_limit_kb: 262_144,
            test_cases: vec![TestCaseWire {
                id: "1".to_string(),
                input: "1 2".to_string(),
                expected_output: "3".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn evaluate_decodes_a_successful_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/evaluate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "submission_id": "sub-1",
                "overall_status": "Accepted",
                "compile_log": "",
                "max_time_ms": 5,
                "max_memory_kb": 1024,
                "tests": [],
            })))
            .mount(&server)
            .await;

        let client = HttpEngineClient::new(server.uri(), std::time::Duration::from_secs(1));
        let result = client.evaluate(sample_request()).await.unwrap();

        assert_eq!(result.submission_id, "sub-1");
        assert!(matches!(
            result.overall_status,
            judge_common::OverallStatus::Accepted
        ));
    }

    #[tokio::test]
    async fn evaluate_maps_non_success_status_to_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/evaluate"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = HttpEngineClient::new(server.uri(), std::time::Duration::from_secs(1));
        let err = client.evaluate(sample_request()).await.unwrap_err();

        assert!(matches!(err, AppError::Upstream(_)));
    }
}
