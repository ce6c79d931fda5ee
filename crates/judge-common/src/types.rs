//! Wire types shared by the evaluation engine and the submission proxy.
//!
//! These are the types that actually cross the HTTP boundary; both binaries
//! depend on this crate so that a change to the wire contract only has to be
//! made in one place.

use serde::{Deserialize, Serialize};

/// Per-test verdict. The wire representation is a closed set of stable
/// strings — never a numeric ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    RuntimeError,
    InternalError,
}

impl TestStatus {
    /// The stable wire string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Accepted => "Accepted",
            TestStatus::WrongAnswer => "WrongAnswer",
            TestStatus::TimeLimitExceeded => "TimeLimitExceeded",
            TestStatus::RuntimeError => "RuntimeError",
            TestStatus::InternalError => "InternalError",
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, TestStatus::Accepted)
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall submission verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallStatus {
    Accepted,
    CompilationError,
    PartialAccepted,
    InternalError,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Accepted => "Accepted",
            OverallStatus::CompilationError => "CompilationError",
            OverallStatus::PartialAccepted => "PartialAccepted",
            OverallStatus::InternalError => "InternalError",
        }
    }
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single test case as carried on the wire: input and expected output are
/// both plain strings, matching the evaluation endpoint's JSON contract. An
/// empty `expected_output` signals scratch-run semantics for that test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCaseWire {
    pub id: String,
    pub input: String,
    pub expected_output: String,
}

/// Request body accepted by the evaluation endpoint. The proxy also
/// constructs and serializes one of these when relaying to the engine, so
/// it carries both derives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub submission_id: String,
    pub problem_id: String,
    pub language: String,
    pub source_code: String,
    #[serde(default = "default_time_limit_ms")]
    pub time_limit_ms: u64,
    #[serde(default = "default_memory_limit_kb")]
    pub memory_limit_kb: u64,
    pub test_cases: Vec<TestCaseWire>,
}

fn default_time_limit_ms() -> u64 {
    2000
}

fn default_memory_limit_kb() -> u64 {
    262_144
}

/// Resource limits derived from a [`SubmissionRequest`] for a single sandbox
/// invocation. See `RunLimits::derive` in `evalcore` for the formulas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunLimits {
    pub time_limit_seconds: u64,
    pub memory_limit_mb: u64,
    pub cpu_limit: f64,
    pub pids_limit: u64,
}

impl Default for RunLimits {
    fn default() -> Self {
        RunLimits {
            time_limit_seconds: 2,
            memory_limit_mb: 256,
            cpu_limit: 1.0,
            pids_limit: 64,
        }
    }
}

/// Result of judging a single test, as returned on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResultWire {
    pub id: String,
    pub status: TestStatus,
    pub time_ms: u64,
    pub memory_kb: u64,
    pub runtime_log: String,
}

/// Full result returned by the evaluation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResultWire {
    pub submission_id: String,
    pub overall_status: OverallStatus,
    pub compile_log: String,
    pub max_time_ms: u64,
    pub max_memory_kb: u64,
    pub tests: Vec<TestResultWire>,
}

impl EvaluationResultWire {
    /// Aggregate max time / memory over the reported tests (0 if empty).
    pub fn max_over(tests: &[TestResultWire]) -> (u64, u64) {
        let max_time = tests.iter().map(|t| t.time_ms).max().unwrap_or(0);
        let max_memory = tests.iter().map(|t| t.memory_kb).max().unwrap_or(0);
        (max_time, max_memory)
    }

    /// Accepted iff every test is Accepted, otherwise PartialAccepted.
    pub fn aggregate_status(tests: &[TestResultWire]) -> OverallStatus {
        if !tests.is_empty() && tests.iter().all(|t| t.status.is_accepted()) {
            OverallStatus::Accepted
        } else {
            OverallStatus::PartialAccepted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_strings_are_stable() {
        assert_eq!(TestStatus::Accepted.as_str(), "Accepted");
        assert_eq!(TestStatus::WrongAnswer.as_str(), "WrongAnswer");
        assert_eq!(TestStatus::TimeLimitExceeded.as_str(), "TimeLimitExceeded");
        assert_eq!(TestStatus::RuntimeError.as_str(), "RuntimeError");
        assert_eq!(TestStatus::InternalError.as_str(), "InternalError");
    }

    #[test]
    fn overall_status_wire_strings_are_stable() {
        assert_eq!(OverallStatus::Accepted.as_str(), "Accepted");
        assert_eq!(OverallStatus::CompilationError.as_str(), "CompilationError");
        assert_eq!(OverallStatus::PartialAccepted.as_str(), "PartialAccepted");
        assert_eq!(OverallStatus::InternalError.as_str(), "InternalError");
    }

    #[test]
    fn default_run_limits_match_spec_defaults() {
        let limits = RunLimits::default();
        assert_eq!(limits.time_limit_seconds, 2);
        assert_eq!(limits.memory_limit_mb, 256);
        assert_eq!(limits.cpu_limit, 1.0);
        assert_eq!(limits.pids_limit, 64);
    }

    fn result(id: &str, status: TestStatus, time_ms: u64, memory_kb: u64) -> TestResultWire {
        TestResultWire {
            id: id.into(),
            status,
            time_ms,
            memory_kb,
            runtime_log: String::new(),
        }
    }

    #[test]
    fn aggregate_status_all_accepted() {
        let tests = vec![
            result("1", TestStatus::Accepted, 10, 100),
            result("2", TestStatus::Accepted, 20, 200),
        ];
        assert_eq!(
            EvaluationResultWire::aggregate_status(&tests),
            OverallStatus::Accepted
        );
        assert_eq!(EvaluationResultWire::max_over(&tests), (20, 200));
    }

    #[test]
    fn aggregate_status_partial_on_any_non_accept() {
        let tests = vec![
            result("1", TestStatus::Accepted, 10, 100),
            result("2", TestStatus::WrongAnswer, 20, 200),
        ];
        assert_eq!(
            EvaluationResultWire::aggregate_status(&tests),
            OverallStatus::PartialAccepted
        );
    }

    #[test]
    fn aggregate_status_partial_when_no_tests_accepted() {
        let tests = vec![result("1", TestStatus::RuntimeError, 5, 50)];
        assert_eq!(
            EvaluationResultWire::aggregate_status(&tests),
            OverallStatus::PartialAccepted
        );
    }

    #[test]
    fn max_over_empty_is_zero() {
        assert_eq!(EvaluationResultWire::max_over(&[]), (0, 0));
    }
}
