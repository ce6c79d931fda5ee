//! Problem model as returned by the problem catalog service.

use serde::Deserialize;

/// A single test case as the catalog stores it — not yet tagged with the
/// stable numeric id the engine expects, which the proxy assigns on
/// forwarding.
#[derive(Debug, Clone, Deserialize)]
pub struct ProblemTestCase {
    pub input: String,
    pub expected_output: String,
}

/// The subset of a catalog problem the proxy needs to build an evaluation
/// request. The catalog's full document carries title/description/tags/etc;
/// those fields are irrelevant here and simply ignored by `serde`.
#[derive(Debug, Clone, Deserialize)]
pub struct Problem {
    pub problem_id: String,
    pub test_cases: Vec<ProblemTestCase>,
}
