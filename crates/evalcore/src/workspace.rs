//! Per-submission workspace: deterministic materialization of the files a
//! sandbox invocation consumes, plus the background sweep that reclaims old
//! workspace directories.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use judge_common::{CoreError, CoreResult, TestCaseWire};
use tokio::fs;
use walkdir::WalkDir;

/// A single submission's directory, owned exclusively by the Evaluation
/// Service from creation until the result is emitted.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub submission_id: String,
    pub dir: PathBuf,
}

impl Workspace {
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn source_name(language: &str) -> String {
        let ext = match language {
            "c" => "c",
            "python" => "py",
            "rust" => "rs",
            _ => "cpp",
        };
        format!("main.{ext}")
    }

    pub fn input_name(test_id: &str) -> String {
        format!("input_{test_id}")
    }

    pub fn expected_name(test_id: &str) -> String {
        format!("expected_{test_id}")
    }

    pub fn output_name(test_id: &str) -> String {
        format!("output_{test_id}")
    }

    pub fn runtime_log_name(test_id: &str) -> String {
        format!("runtime_{test_id}.log")
    }

    pub const COMPILE_LOG_NAME: &'static str = "compile.log";
}

/// Create `base_dir/submission_id/`. Fails with [`CoreError::Workspace`] if
/// creation is impossible. A workspace is never shared between submissions,
/// so an existing directory at this path is never reused.
pub async fn create(base_dir: &Path, submission_id: &str) -> CoreResult<Workspace> {
    let dir = base_dir.join(submission_id);
    fs::create_dir_all(&dir)
        .await
        .map_err(|e| CoreError::Workspace(format!("cannot create {dir:?}: {e}")))?;
    Ok(Workspace {
        submission_id: submission_id.to_string(),
        dir,
    })
}

/// Write the source file verbatim.
pub async fn write_source(workspace: &Workspace, name: &str, bytes: &str) -> CoreResult<()> {
    let path = workspace.path_for(name);
    fs::write(&path, bytes)
        .await
        .map_err(|e| CoreError::Workspace(format!("cannot write {path:?}: {e}")))
}

/// Write `input_<id>` and `expected_<id>` for every test case, verbatim.
pub async fn write_test_files(workspace: &Workspace, test_cases: &[TestCaseWire]) -> CoreResult<()> {
    for tc in test_cases {
        let input_path = workspace.path_for(&Workspace::input_name(&tc.id));
        fs::write(&input_path, &tc.input)
            .await
            .map_err(|e| CoreError::Workspace(format!("cannot write {input_path:?}: {e}")))?;

        let expected_path = workspace.path_for(&Workspace::expected_name(&tc.id));
        fs::write(&expected_path, &tc.expected_output)
            .await
            .map_err(|e| CoreError::Workspace(format!("cannot write {expected_path:?}: {e}")))?;
    }
    Ok(())
}

/// Tracks submission ids that currently have a sandbox invocation in
/// flight, so the sweep never deletes a workspace out from under a running
/// compile/run.
#[derive(Debug, Default, Clone)]
pub struct InFlightRegistry {
    ids: Arc<Mutex<HashSet<String>>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle sharing the same underlying set, for a background task that
    /// needs its own owned copy of the registry.
    pub fn clone_handle(&self) -> Self {
        self.clone()
    }

    pub fn mark_busy(&self, submission_id: &str) {
        self.ids.lock().unwrap().insert(submission_id.to_string());
    }

    pub fn mark_idle(&self, submission_id: &str) {
        self.ids.lock().unwrap().remove(submission_id);
    }

    fn is_busy(&self, submission_id: &str) -> bool {
        self.ids.lock().unwrap().contains(submission_id)
    }
}

/// Remove top-level submission directories under `base_dir` whose
/// modification time is older than `max_age`, skipping any submission the
/// registry reports as busy. Returns the number of directories removed.
pub async fn sweep(base_dir: &Path, max_age: Duration, registry: &InFlightRegistry) -> usize {
    if !base_dir.exists() {
        return 0;
    }

    let now = SystemTime::now();
    let mut removed = 0usize;

    let entries: Vec<PathBuf> = WalkDir::new(base_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.path().to_path_buf())
        .collect();

    for dir in entries {
        let Some(submission_id) = dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if registry.is_busy(submission_id) {
            continue;
        }

        let age = match fs::metadata(&dir).await.and_then(|m| m.modified()) {
            Ok(modified) => now.duration_since(modified).unwrap_or_default(),
            Err(_) => continue,
        };

        if age >= max_age && fs::remove_dir_all(&dir).await.is_ok() {
            removed += 1;
            tracing::info!("swept stale workspace {:?}", dir);
        }
    }

    removed
}
