//! Shared error baseline for the evaluation core.
//!
//! Both `evalcore` and `codecoach-proxy` wrap this in their own `AppError`
//! (which adds surface-specific variants and the axum `IntoResponse` impl);
//! `CoreError` only carries the kinds of failure that are meaningful at the
//! evaluation-core boundary itself.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// Request failed input validation (missing/ill-typed field, duplicate
    /// test ids). No workspace is created for this kind of error.
    #[error("validation error: {0}")]
    Validation(String),

    /// A named resource (problem, submission) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The submission workspace could not be created or written to.
    #[error("workspace error: {0}")]
    Workspace(String),

    /// The sandbox could not be started at all (not a per-test failure).
    #[error("sandbox error: {0}")]
    Sandbox(String),

    /// An upstream HTTP collaborator (problem catalog, evaluation engine)
    /// was unreachable or returned a non-success status.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Anything else; reported to the caller as an opaque 500.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn status_code(&self) -> u16 {
        match self {
            CoreError::Validation(_) => 400,
            CoreError::NotFound(_) => 404,
            CoreError::Workspace(_) => 500,
            CoreError::Sandbox(_) => 500,
            CoreError::Upstream(_) => 502,
            CoreError::Internal(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => "VALIDATION_ERROR",
            CoreError::NotFound(_) => "NOT_FOUND",
            CoreError::Workspace(_) => "WORKSPACE_ERROR",
            CoreError::Sandbox(_) => "SANDBOX_ERROR",
            CoreError::Upstream(_) => "UPSTREAM_ERROR",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
