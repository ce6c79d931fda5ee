//! The Sandbox Runner: compiles a submission and runs its compiled artifact
//! once per test, confined by time/memory/CPU/process limits with network
//! disabled.
//!
//! Both operations spawn the child via a structured argv array
//! (`tokio::process::Command`) and apply resource confinement through a
//! `pre_exec` hook built on `nix` — never by composing a shell string.

pub mod compile;
pub mod confine;
pub mod limits;
pub mod run;

use std::path::PathBuf;

pub use compile::compile;
pub use run::run;

/// Outcome of compiling one submission.
#[derive(Debug, Clone)]
pub struct CompileOutcome {
    pub exit_code: i32,
    pub log_path: PathBuf,
}

/// Outcome of running the compiled artifact against one test.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub exit_code: i32,
    pub timed_out: bool,
    pub output_path: PathBuf,
    pub runtime_log_path: PathBuf,
}

/// Exit code convention for a sandbox-enforced timeout, mirroring the
/// behavior of the `timeout(1)` wrapper this design replaces.
pub const TIMEOUT_EXIT_CODE: i32 = 124;
