//! Submission proxy service: attaches test cases and relays to the
//! evaluation engine. Stateless business logic, kept separate from the
//! handlers so it can be exercised against fake clients in tests.

use judge_common::{EvaluationResultWire, SubmissionRequest, TestCaseWire};
use uuid::Uuid;

use crate::clients::{EngineClient, ProblemCatalogClient};
use crate::constants::{DEFAULT_TIME_LIMIT_MS, SCRATCH_TEST_ID};
use crate::error::{AppError, AppResult};

/// Submission proxy service for business logic
pub struct ProxyService;

impl ProxyService {
    /// Evaluate a problem submission: look the problem up in the catalog,
    /// attach its test cases in catalog order with synthetic ids "1", "2",
    /// …, and relay to the evaluation engine.
    pub async fn evaluate_problem_submission(
        catalog: &dyn ProblemCatalogClient,
        engine: &dyn EngineClient,
        problem_id: &str,
        language: &str,
        source_code: &str,
        time_limit_ms: Option<u64>,
    ) -> AppResult<EvaluationResultWire> {
        let problem = catalog
            .get_problem(problem_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("problem not found: {problem_id}")))?;

        if problem.test_cases.is_empty() {
            return Err(AppError::Validation(format!(
                "problem {problem_id} has no test cases"
            )));
        }

        let test_cases = problem
            .test_cases
            .into_iter()
            .enumerate()
            .map(|(index, tc)| TestCaseWire {
                id: (index + 1).to_string(),
                input: tc.input,
                expected_output: tc.expected_output,
            })
            .collect();

        let request = SubmissionRequest {
            submission_id: Uuid::new_v4().to_string(),
            problem_id: problem_id.to_string(),
            language: language.to_string(),
            source_code: source_code.to_string(),
            time_limit_ms: time_limit_ms.unwrap_or(DEFAULT_TIME_LIMIT_MS),
            memory_limit_kb: judge_common::RunLimits::default().memory_limit_mb * 1024,
            test_cases,
        };

        engine.evaluate(request).await
    }

    /// Run a single piece of source code against a single user-supplied
    /// input, without grading. A single test with an empty
    /// `expected_output` forwards the existing evaluation path and relies
    /// on verdict classification step 4 to mark it Accepted whenever the
    /// program runs to completion.
    pub async fn scratch_run(
        engine: &dyn EngineClient,
        language: &str,
        source_code: &str,
        input: &str,
    ) -> AppResult<EvaluationResultWire> {
        let request = SubmissionRequest {
            submission_id: Uuid::new_v4().to_string(),
            problem_id: "scratch".to_string(),
            language: language.to_string(),
            source_code: source_code.to_string(),
            time_limit_ms: DEFAULT_TIME_LIMIT_MS,
            memory_limit_kb: judge_common::RunLimits::default().memory_limit_mb * 1024,
            test_cases: vec![TestCaseWire {
                id: SCRATCH_TEST_ID.to_string(),
                input: input.to_string(),
                expected_output: String::new(),
            }],
        };

        engine.evaluate(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use judge_common::{OverallStatus, TestResultWire, TestStatus};

    use crate::models::{Problem, ProblemTestCase};

    struct FakeCatalog {
        problem: Option<Problem>,
    }

    #[async_trait]
    impl ProblemCatalogClient for FakeCatalog {
        async fn get_problem(&self, _problem_id: &str) -> AppResult<Option<Problem>> {
            Ok(self.problem.clone())
        }
    }

    struct FakeEngine {
        last_request: std::sync::Mutex<Option<SubmissionRequest>>,
    }

    impl FakeEngine {
        fn new() -> Self {
            Self {
                last_request: std::sync::Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl EngineClient for FakeEngine {
        async fn evaluate(&self, request: SubmissionRequest) -> AppResult<EvaluationResultWire> {
            let submission_id = request.submission_id.clone();
            let tests = request
                .test_cases
                .iter()
                .map(|tc| TestResultWire {
                    id: tc.id.clone(),
                    status: TestStatus::Accepted,
                    time_ms: 5,
                    memory_kb: 1024,
                    runtime_log: String::new(),
                })
                .collect::<Vec<_>>();
            *self.last_request.lock().unwrap() = Some(request);
            Ok(EvaluationResultWire {
                submission_id,
                overall_status: OverallStatus::Accepted,
                compile_log: String::new(),
                max_time_ms: 5,
                max_memory_kb: 1024,
                tests,
            })
        }
    }

    #[tokio::test]
    async fn evaluate_problem_submission_attaches_synthetic_ids_in_catalog_order() {
        let catalog = FakeCatalog {
            problem: Some(Problem {
                problem_id: "sum-two-numbers".to_string(),
                test_cases: vec![
                    ProblemTestCase {
                        input: "1 2".to_string(),
                        expected_output: "3".to_string(),
                    },
                    ProblemTestCase {
                        input: "5 5".to_string(),
                        expected_output: "10".to_string(),
                    },
                ],
            }),
        };
        let engine = FakeEngine::new();

        let result = ProxyService::evaluate_problem_submission(
            &catalog,
            &engine,
            "sum-two-numbers",
            "cpp",
            "int main(){}",
            None,
        )
        .await
        .unwrap();

        assert_eq!(result.tests.len(), 2);
        assert_eq!(result.tests[0].id, "1");
        assert_eq!(result.tests[1].id, "2");

        let sent = engine.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(sent.test_cases[0].expected_output, "3");
        assert_eq!(sent.time_limit_ms, DEFAULT_TIME_LIMIT_MS);
    }

    #[tokio::test]
    async fn evaluate_problem_submission_missing_problem_is_not_found() {
        let catalog = FakeCatalog { problem: None };
        let engine = FakeEngine::new();

        let err = ProxyService::evaluate_problem_submission(
            &catalog, &engine, "nope", "cpp", "code", None,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn evaluate_problem_submission_with_no_test_cases_is_validation_error() {
        let catalog = FakeCatalog {
            problem: Some(Problem {
                problem_id: "empty".to_string(),
                test_cases: vec![],
            }),
        };
        let engine = FakeEngine::new();

        let err = ProxyService::evaluate_problem_submission(
            &catalog, &engine, "empty", "cpp", "code", None,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn scratch_run_forwards_a_single_test_with_empty_expected_output() {
        let engine = FakeEngine::new();

        let result = ProxyService::scratch_run(&engine, "cpp", "int main(){}", "hello\n")
            .await
            .unwrap();

        assert_eq!(result.tests.len(), 1);
        assert_eq!(result.tests[0].id, SCRATCH_TEST_ID);

        let sent = engine.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(sent.test_cases[0].expected_output, "");
        assert_eq!(sent.test_cases[0].input, "hello\n");
    }
}
