//! The Compile operation: invoke the configured compiler against the
//! submission source, capturing diagnostics to `compile.log`.
//!
//! Compilation runs as the service's own uid (it needs to write the
//! compiled artifact into a workspace it owns) but still denies network
//! access and caps CPU time and address space, so a pathological source
//! file (an infinite `#include` loop, a template bomb) cannot wedge the
//! service.

use std::os::unix::process::CommandExt as _;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tokio::time::{timeout, Duration};

use super::confine::Confinement;
use super::CompileOutcome;
use crate::config::SandboxConfig;
use crate::workspace::Workspace;

/// Compile `source_name` inside `workspace` using `sandbox.compiler`,
/// producing `output_name` and appending stderr to `compile.log`.
pub async fn compile(
    workspace: &Workspace,
    source_name: &str,
    output_name: &str,
    sandbox: &SandboxConfig,
) -> std::io::Result<CompileOutcome> {
    let source_path = workspace.path_for(source_name);
    let output_path = workspace.path_for(output_name);
    let log_path = workspace.path_for(Workspace::COMPILE_LOG_NAME);

    let stderr = std::fs::File::create(&log_path)?;

    let confinement = Confinement {
        cpu_time_seconds: sandbox.compile_time_limit_seconds,
        address_space_bytes: sandbox.compile_memory_limit_mb * 1024 * 1024,
        pids_limit: 64,
        drop_to: None,
    };

    let mut command = Command::new(&sandbox.compiler);
    command
        .args(&sandbox.compiler_args)
        .arg(&source_path)
        .arg("-o")
        .arg(&output_path)
        .current_dir(&workspace.dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::from(stderr))
        .kill_on_drop(true);

    // SAFETY: the closure only calls async-signal-safe syscall wrappers
    // (setrlimit/unshare) between fork and exec.
    unsafe {
        command.pre_exec(move || confinement.apply());
    }

    let mut child = command.spawn()?;

    let wall_clock = Duration::from_secs(sandbox.compile_time_limit_seconds);
    let exit_code = match timeout(wall_clock, child.wait()).await {
        Ok(Ok(status)) => exit_code_of(&status),
        Ok(Err(e)) => return Err(e),
        Err(_) => {
            let _ = child.start_kill();
            let _ = child.wait().await;
            append_timeout_note(&log_path).await;
            super::TIMEOUT_EXIT_CODE
        }
    };

    Ok(CompileOutcome { exit_code, log_path })
}

/// An artifact is usable only if the compiler exited 0 and actually wrote
/// the output binary — some compilers exit 0 even after reporting only
/// warnings on a linker failure path, so both are checked.
pub fn artifact_exists(outcome: &CompileOutcome, output_path: &Path) -> bool {
    outcome.exit_code == 0 && output_path.exists()
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

async fn append_timeout_note(log_path: &PathBuf) {
    use tokio::io::AsyncWriteExt;
    if let Ok(mut file) = tokio::fs::OpenOptions::new().append(true).open(log_path).await {
        let _ = file.write_all(b"\ncompilation timed out\n").await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace;

    fn test_sandbox_config() -> SandboxConfig {
        SandboxConfig {
            compiler: "g++".to_string(),
            compiler_args: vec!["-O2".to_string(), "-std=c++17".to_string()],
            sandbox_uid: nix::unistd::getuid().as_raw(),
            sandbox_gid: nix::unistd::getgid().as_raw(),
            compile_time_limit_seconds: 10,
            compile_memory_limit_mb: 512,
        }
    }

    #[tokio::test]
    async fn successful_compile_writes_artifact_and_empty_log() {
        if which_missing("g++") {
            return;
        }
        let base = tempfile::tempdir().unwrap();
        let ws = workspace::create(base.path(), "sub-compile-1").await.unwrap();
        workspace::write_source(&ws, "main.cpp", "int main(){ return 0; }\n")
            .await
            .unwrap();

        let sandbox = test_sandbox_config();
        let outcome = compile(&ws, "main.cpp", "main", &sandbox).await.unwrap();

        assert_eq!(outcome.exit_code, 0);
        assert!(artifact_exists(&outcome, &ws.path_for("main")));
    }

    #[tokio::test]
    async fn broken_source_yields_nonzero_exit_and_diagnostics() {
        if which_missing("g++") {
            return;
        }
        let base = tempfile::tempdir().unwrap();
        let ws = workspace::create(base.path(), "sub-compile-2").await.unwrap();
        workspace::write_source(&ws, "main.cpp", "int main() { return \n")
            .await
            .unwrap();

        let sandbox = test_sandbox_config();
        let outcome = compile(&ws, "main.cpp", "main", &sandbox).await.unwrap();

        assert_ne!(outcome.exit_code, 0);
        assert!(!artifact_exists(&outcome, &ws.path_for("main")));
        let log = tokio::fs::read_to_string(&outcome.log_path).await.unwrap();
        assert!(!log.is_empty());
    }

    fn which_missing(program: &str) -> bool {
        std::process::Command::new("which")
            .arg(program)
            .output()
            .map(|o| !o.status.success())
            .unwrap_or(true)
    }
}
