//! Submission request DTOs

use serde::Deserialize;

/// Evaluate a problem submission
#[derive(Debug, Deserialize)]
pub struct SubmitProblemRequest {
    pub problem_id: String,
    pub language: String,
    pub source_code: String,
    pub time_limit_ms: Option<u64>,
}

/// Run source code against a single input, without grading. `language` is
/// optional; callers that omit it get [`crate::constants::DEFAULT_LANGUAGE`].
#[derive(Debug, Deserialize)]
pub struct ScratchRunRequest {
    pub language: Option<String>,
    pub source_code: String,
    pub input: String,
}
