//! The Run operation: execute the previously compiled artifact once, input
//! redirected from a file, stdout/stderr captured to files, wrapped by a
//! wall-clock timeout and confined per [`RunLimits`].

use std::os::unix::process::CommandExt as _;
use std::process::Stdio;

use judge_common::RunLimits;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use super::confine::Confinement;
use super::{RunOutcome, TIMEOUT_EXIT_CODE};
use crate::workspace::Workspace;

/// Run `binary_path` with `input_name` as stdin, capturing stdout to
/// `output_name` and stderr to `runtime_log_name`, both inside `workspace`.
///
/// The runner never mutates files other than the three it is given for this
/// invocation, plus the log it appends a peak-memory line to.
pub async fn run(
    workspace: &Workspace,
    binary_path: &std::path::Path,
    binary_args: &[String],
    input_name: &str,
    output_name: &str,
    runtime_log_name: &str,
    limits: RunLimits,
    sandbox_uid: u32,
    sandbox_gid: u32,
) -> std::io::Result<RunOutcome> {
    let input_path = workspace.path_for(input_name);
    let output_path = workspace.path_for(output_name);
    let runtime_log_path = workspace.path_for(runtime_log_name);

    let stdin = std::fs::File::open(&input_path)?;
    let stdout = std::fs::File::create(&output_path)?;
    let stderr = std::fs::File::create(&runtime_log_path)?;

    let confinement = Confinement {
        cpu_time_seconds: limits.time_limit_seconds,
        address_space_bytes: limits.memory_limit_mb * 1024 * 1024,
        pids_limit: limits.pids_limit,
        drop_to: Some((sandbox_uid, sandbox_gid)),
    };

    let mut command = Command::new(binary_path);
    command
        .args(binary_args)
        .stdin(Stdio::from(stdin))
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr))
        .kill_on_drop(true);

    // SAFETY: the closure only calls async-signal-safe syscall wrappers
    // (setrlimit/unshare/setuid/setgid) between fork and exec.
    unsafe {
        command.pre_exec(move || confinement.apply());
    }

    let mut child = command.spawn()?;

    let wall_clock = Duration::from_secs(limits.time_limit_seconds);
    match timeout(wall_clock, child.wait()).await {
        Ok(Ok(status)) => {
            let exit_code = exit_code_of(&status);
            append_peak_memory_line(&runtime_log_path).await;
            Ok(RunOutcome {
                exit_code,
                timed_out: false,
                output_path,
                runtime_log_path,
            })
        }
        Ok(Err(e)) => Err(e),
        Err(_) => {
            let _ = child.start_kill();
            let _ = child.wait().await;
            append_peak_memory_line(&runtime_log_path).await;
            Ok(RunOutcome {
                exit_code: TIMEOUT_EXIT_CODE,
                timed_out: true,
                output_path,
                runtime_log_path,
            })
        }
    }
}

fn exit_code_of(status: &std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}

/// Append a "maximum resident set size (kbytes): N" line the service can
/// parse back out when reporting memory usage. A real deployment would
/// prefer reading this from `/proc/<pid>/status` while the child is still
/// alive; `rusage` from `wait4` is the portable fallback used here.
async fn append_peak_memory_line(runtime_log_path: &std::path::Path) {
    use tokio::io::AsyncWriteExt;

    let peak_kb = peak_rss_kb();
    if let Ok(mut file) = tokio::fs::OpenOptions::new()
        .append(true)
        .open(runtime_log_path)
        .await
    {
        let line = format!("\nMaximum resident set size (kbytes): {peak_kb}\n");
        let _ = file.write_all(line.as_bytes()).await;
    }
}

/// Peak RSS of the most recently reaped child, via `getrusage(RUSAGE_CHILDREN)`.
fn peak_rss_kb() -> u64 {
    use nix::sys::resource::{getrusage, UsageWho};
    getrusage(UsageWho::RUSAGE_CHILDREN)
        .map(|usage| usage.max_rss() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace;

    #[tokio::test]
    async fn successful_run_captures_stdout_and_reports_memory() {
        let base = tempfile::tempdir().unwrap();
        let ws = workspace::create(base.path(), "sub-run-1").await.unwrap();
        workspace::write_test_files(
            &ws,
            &[judge_common::TestCaseWire {
                id: "1".into(),
                input: "hello\n".into(),
                expected_output: String::new(),
            }],
        )
        .await
        .unwrap();

        let outcome = run(
            &ws,
            std::path::Path::new("/bin/cat"),
            &[],
            &workspace::Workspace::input_name("1"),
            &workspace::Workspace::output_name("1"),
            &workspace::Workspace::runtime_log_name("1"),
            RunLimits {
                time_limit_seconds: 2,
                memory_limit_mb: 256,
                cpu_limit: 1.0,
                pids_limit: 64,
            },
            // Run as the current (test) uid/gid — dropping to an
            // unprivileged id the test process doesn't own would fail.
            nix::unistd::getuid().as_raw(),
            nix::unistd::getgid().as_raw(),
        )
        .await
        .unwrap();

        assert!(!outcome.timed_out);
        assert_eq!(outcome.exit_code, 0);
        let output = tokio::fs::read_to_string(&outcome.output_path).await.unwrap();
        assert_eq!(output, "hello\n");
        let log = tokio::fs::read_to_string(&outcome.runtime_log_path).await.unwrap();
        assert!(log.contains("Maximum resident set size"));
    }

    #[tokio::test]
    async fn timed_out_run_reports_124() {
        let base = tempfile::tempdir().unwrap();
        let ws = workspace::create(base.path(), "sub-run-2").await.unwrap();
        workspace::write_test_files(
            &ws,
            &[judge_common::TestCaseWire {
                id: "1".into(),
                input: String::new(),
                expected_output: String::new(),
            }],
        )
        .await
        .unwrap();

        let outcome = run(
            &ws,
            std::path::Path::new("/bin/sleep"),
            &["2".to_string()],
            &workspace::Workspace::input_name("1"),
            &workspace::Workspace::output_name("1"),
            &workspace::Workspace::runtime_log_name("1"),
            RunLimits {
                time_limit_seconds: 1,
                memory_limit_mb: 256,
                cpu_limit: 1.0,
                pids_limit: 64,
            },
            nix::unistd::getuid().as_raw(),
            nix::unistd::getgid().as_raw(),
        )
        .await
        .unwrap();

        assert!(outcome.timed_out);
        assert_eq!(outcome.exit_code, TIMEOUT_EXIT_CODE);
    }
}
