//! Client for the problem catalog, the out-of-scope collaborator that owns
//! problem CRUD and test case storage. The proxy only ever reads a single
//! problem by id.

use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::models::Problem;

/// Abstraction over the problem catalog lookup, so `ProxyService` can be
/// tested against a fake without a live catalog.
#[async_trait]
pub trait ProblemCatalogClient: Send + Sync {
    async fn get_problem(&self, problem_id: &str) -> AppResult<Option<Problem>>;
}

/// `reqwest`-backed implementation calling the catalog's `GET /problems/{id}`.
pub struct HttpProblemCatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpProblemCatalogClient {
    pub fn new(base_url: String, timeout: std::time::Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build catalog HTTP client");
        Self { http, base_url }
    }
}

#[async_trait]
impl ProblemCatalogClient for HttpProblemCatalogClient {
    async fn get_problem(&self, problem_id: &str) -> AppResult<Option<Problem>> {
        let url = format!("{}/problems/{}", self.base_url, problem_id);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("problem catalog request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "problem catalog returned {}",
                response.status()
            )));
        }

        let problem = response
            .json::<Problem>()
            .await
            .map_err(|e| AppError::Upstream(format!("invalid problem catalog response: {e}")))?;

        Ok(Some(problem))
    }
}
