//! Submission response DTOs
//!
//! Both submission operations relay the evaluation engine's result body
//! verbatim, so there is no proxy-specific response shape to define here —
//! handlers return `judge_common::EvaluationResultWire` directly.
