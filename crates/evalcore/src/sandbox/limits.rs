//! Derivation of [`RunLimits`] from a submission request's raw time/memory
//! limits.

use judge_common::RunLimits;

/// `time_limit_seconds = max(1, time_limit_ms / 1000)`
/// `memory_limit_mb = max(16, memory_limit_kb / 1024)` when `memory_limit_kb > 0`, else `256`
/// `cpu_limit = 1.0`, `pids_limit = 64`
pub fn derive(time_limit_ms: u64, memory_limit_kb: u64) -> RunLimits {
    let time_limit_seconds = std::cmp::max(1, time_limit_ms / 1000);
    let memory_limit_mb = if memory_limit_kb > 0 {
        std::cmp::max(16, memory_limit_kb / 1024)
    } else {
        256
    };

    RunLimits {
        time_limit_seconds,
        memory_limit_mb,
        cpu_limit: 1.0,
        pids_limit: 64,
    }
}
