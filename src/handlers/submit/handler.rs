//! Submission handler implementations

use axum::{extract::State, Json};
use judge_common::EvaluationResultWire;

use crate::{constants::DEFAULT_LANGUAGE, error::AppResult, services::ProxyService, state::AppState};

use super::request::{ScratchRunRequest, SubmitProblemRequest};

/// Evaluate a problem submission: look the problem up, attach its test
/// cases, relay to the engine, and return its verdict verbatim.
pub async fn submit_problem(
    State(state): State<AppState>,
    Json(payload): Json<SubmitProblemRequest>,
) -> AppResult<Json<EvaluationResultWire>> {
    let result = ProxyService::evaluate_problem_submission(
        state.catalog(),
        state.engine(),
        &payload.problem_id,
        &payload.language,
        &payload.source_code,
        payload.time_limit_ms,
    )
    .await?;

    Ok(Json(result))
}

/// Run source code against a single input without grading.
pub async fn scratch_run(
    State(state): State<AppState>,
    Json(payload): Json<ScratchRunRequest>,
) -> AppResult<Json<EvaluationResultWire>> {
    let language = payload.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);
    let result = ProxyService::scratch_run(state.engine(), language, &payload.source_code, &payload.input)
        .await?;

    Ok(Json(result))
}
