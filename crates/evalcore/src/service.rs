//! Evaluation Service: the orchestrator tying workspace materialization,
//! compilation, per-test sandbox runs, and verdict aggregation into the
//! single `evaluate` entry point the HTTP handler calls.

use std::time::Instant;

use judge_common::{EvaluationResultWire, OverallStatus, SubmissionRequest, TestResultWire, TestStatus};

use crate::config::Config;
use crate::sandbox::{self, limits};
use crate::verdict::{self, RunObservation};
use crate::workspace::{self, InFlightRegistry, Workspace};

/// Parse the `Maximum resident set size (kbytes): N` line [`sandbox::run`]
/// appends to a runtime log, returning 0 if it isn't present.
fn extract_max_memory_kb(log_text: &str) -> u64 {
    const KEY: &str = "Maximum resident set size (kbytes):";
    log_text
        .lines()
        .find_map(|line| line.find(KEY).map(|pos| line[pos + KEY.len()..].trim()))
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

/// Run one submission end to end: materialize its workspace, compile,
/// execute every test case in order, classify each, aggregate, and return
/// the wire result. The workspace is marked busy in `registry` for the
/// whole call so the background sweep can't delete it mid-flight.
pub async fn evaluate(
    request: SubmissionRequest,
    config: &Config,
    registry: &InFlightRegistry,
) -> EvaluationResultWire {
    registry.mark_busy(&request.submission_id);
    let result = evaluate_inner(&request, config).await;
    registry.mark_idle(&request.submission_id);
    result
}

async fn evaluate_inner(request: &SubmissionRequest, config: &Config) -> EvaluationResultWire {
    let submission_id = request.submission_id.clone();

    let workspace = match workspace::create(&config.storage.base_dir, &submission_id).await {
        Ok(ws) => ws,
        Err(e) => return internal_error(&submission_id, &format!("workspace error: {e}")),
    };

    let source_name = Workspace::source_name(&request.language);
    if let Err(e) = workspace::write_source(&workspace, &source_name, &request.source_code).await {
        return internal_error(&submission_id, &format!("workspace error: {e}"));
    }
    if let Err(e) = workspace::write_test_files(&workspace, &request.test_cases).await {
        return internal_error(&submission_id, &format!("workspace error: {e}"));
    }

    let compile_outcome = match sandbox::compile(&workspace, &source_name, "main", &config.sandbox).await
    {
        Ok(outcome) => outcome,
        Err(e) => return internal_error(&submission_id, &format!("compiler launch failed: {e}")),
    };

    let compile_log = tokio::fs::read_to_string(&compile_outcome.log_path)
        .await
        .unwrap_or_default();

    let binary_path = workspace.path_for("main");
    if compile_outcome.exit_code != 0 || !binary_path.exists() {
        return EvaluationResultWire {
            submission_id,
            overall_status: OverallStatus::CompilationError,
            compile_log,
            max_time_ms: 0,
            max_memory_kb: 0,
            tests: Vec::new(),
        };
    }

    let run_limits = limits::derive(request.time_limit_ms, request.memory_limit_kb);

    let mut tests = Vec::with_capacity(request.test_cases.len());
    for test_case in &request.test_cases {
        let input_name = Workspace::input_name(&test_case.id);
        let output_name = Workspace::output_name(&test_case.id);
        let runtime_log_name = Workspace::runtime_log_name(&test_case.id);

        let started = Instant::now();
        let run_outcome = sandbox::run(
            &workspace,
            &binary_path,
            &[],
            &input_name,
            &output_name,
            &runtime_log_name,
            run_limits,
            config.sandbox.sandbox_uid,
            config.sandbox.sandbox_gid,
        )
        .await;
        let time_ms = started.elapsed().as_millis() as u64;

        let test_result = match run_outcome {
            Ok(outcome) => {
                let mut runtime_log = tokio::fs::read_to_string(&outcome.runtime_log_path)
                    .await
                    .unwrap_or_default();
                let memory_kb = extract_max_memory_kb(&runtime_log);

                let observation = RunObservation {
                    exit_code: outcome.exit_code,
                    timed_out: outcome.timed_out,
                    output_path: &outcome.output_path,
                    expected_output: &test_case.expected_output,
                    time_ms,
                    memory_kb,
                };
                let classification = verdict::classify(&observation);
                if let Some(note) = &classification.note {
                    runtime_log.push_str(&format!("\n[{note}]\n"));
                }
                crate::metrics::record_test(
                    classification.status.as_str(),
                    time_ms as f64 / 1000.0,
                    memory_kb,
                );

                TestResultWire {
                    id: test_case.id.clone(),
                    status: classification.status,
                    time_ms,
                    memory_kb,
                    runtime_log,
                }
            }
            Err(e) => {
                crate::metrics::record_test(
                    TestStatus::InternalError.as_str(),
                    time_ms as f64 / 1000.0,
                    0,
                );
                TestResultWire {
                    id: test_case.id.clone(),
                    status: TestStatus::InternalError,
                    time_ms,
                    memory_kb: 0,
                    runtime_log: format!("sandbox launch failed: {e}"),
                }
            }
        };

        tests.push(test_result);
    }

    let (max_time_ms, max_memory_kb) = EvaluationResultWire::max_over(&tests);
    let overall_status = EvaluationResultWire::aggregate_status(&tests);
    crate::metrics::record_submission(overall_status.as_str());

    EvaluationResultWire {
        submission_id,
        overall_status,
        compile_log,
        max_time_ms,
        max_memory_kb,
        tests,
    }
}

fn internal_error(submission_id: &str, message: &str) -> EvaluationResultWire {
    tracing::error!(submission_id, message, "evaluation failed before compilation");
    EvaluationResultWire {
        submission_id: submission_id.to_string(),
        overall_status: OverallStatus::InternalError,
        compile_log: format!("[INTERNAL ERROR] {message}"),
        max_time_ms: 0,
        max_memory_kb: 0,
        tests: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_memory_from_well_formed_line() {
        let log = "some stderr\nMaximum resident set size (kbytes): 4096\n";
        assert_eq!(extract_max_memory_kb(log), 4096);
    }

    #[test]
    fn missing_line_yields_zero() {
        assert_eq!(extract_max_memory_kb("no memory info here"), 0);
    }

    #[test]
    fn unparseable_value_yields_zero() {
        let log = "Maximum resident set size (kbytes): not-a-number\n";
        assert_eq!(extract_max_memory_kb(log), 0);
    }
}
