//! Configuration for the evaluation engine.

use std::env;
use std::path::PathBuf;

/// Process-wide settings loaded once from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the evaluation HTTP endpoint binds to.
    pub bind_addr: String,

    /// Prometheus metrics port, served by its own listener independent of
    /// the evaluation endpoint.
    pub metrics_port: u16,

    pub storage: StorageConfig,
    pub sandbox: SandboxConfig,
    pub sweep: SweepConfig,
}

/// Where submission workspaces live on disk.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Base directory; each submission gets `base_dir/<submission_id>/`.
    pub base_dir: PathBuf,
}

/// Everything the Sandbox Runner needs to compile and run a submission.
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    /// Compiler binary invoked against the source file.
    pub compiler: String,

    /// Extra flags passed to the compiler, ahead of the source/output args.
    pub compiler_args: Vec<String>,

    /// Unprivileged uid/gid the run step drops to before exec.
    pub sandbox_uid: u32,
    pub sandbox_gid: u32,

    /// Hard ceiling applied to compilation itself, independent of the
    /// submitted program's own run-time limits.
    pub compile_time_limit_seconds: u64,
    pub compile_memory_limit_mb: u64,
}

/// Workspace garbage-collection cadence.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub interval_secs: u64,
    pub workspace_max_age_secs: u64,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_or_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// sensible defaults for anything unset.
    pub fn from_env() -> Self {
        let compiler_args = env::var("EVALCORE_COMPILER_ARGS")
            .unwrap_or_else(|_| "-O2,-std=c++17".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            bind_addr: env_or_string("EVALCORE_BIND_ADDR", "0.0.0.0:8090"),
            metrics_port: env_or("EVALCORE_METRICS_PORT", 9100),
            storage: StorageConfig {
                base_dir: PathBuf::from(env_or_string(
                    "EVALCORE_BASE_DIR",
                    "./data/submissions",
                )),
            },
            sandbox: SandboxConfig {
                compiler: env_or_string("EVALCORE_COMPILER", "g++"),
                compiler_args,
                sandbox_uid: env_or("EVALCORE_SANDBOX_UID", 65534),
                sandbox_gid: env_or("EVALCORE_SANDBOX_GID", 65534),
                compile_time_limit_seconds: env_or("EVALCORE_COMPILE_TIME_LIMIT_SECS", 10),
                compile_memory_limit_mb: env_or("EVALCORE_COMPILE_MEMORY_LIMIT_MB", 512),
            },
            sweep: SweepConfig {
                interval_secs: env_or("EVALCORE_SWEEP_INTERVAL_SECS", 3600),
                workspace_max_age_secs: env_or("EVALCORE_WORKSPACE_MAX_AGE_SECS", 86_400),
            },
        }
    }
}
