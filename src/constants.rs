//! Application-wide constants

/// Default address the proxy's HTTP server binds to.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Default base URLs for the two upstream services, and the shared timeout
/// applied to calls against either of them.
pub const DEFAULT_ENGINE_URL: &str = "http://127.0.0.1:8090";
pub const DEFAULT_CATALOG_URL: &str = "http://127.0.0.1:8081";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// `SubmissionRequest.time_limit_ms` default when the caller omits it.
pub const DEFAULT_TIME_LIMIT_MS: u64 = 2000;

/// The one stable test id used by a scratch run.
pub const SCRATCH_TEST_ID: &str = "1";

/// `language` used for a scratch run when the caller omits it; only one
/// compiler toolchain is configured on the evaluation core.
pub const DEFAULT_LANGUAGE: &str = "cpp";
