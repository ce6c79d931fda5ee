//! Classification of one test's sandbox outcome into a [`TestStatus`], plus
//! the reported time/memory pair that goes on the wire.

use std::path::Path;

use judge_common::TestStatus;

/// A finished run is too large to treat as legitimate program output past
/// this size; a program that floods stdout is a runtime failure, not a
/// wrong answer waiting to be diffed.
const MAX_OUTPUT_BYTES: u64 = 1024 * 1024;

/// Everything needed to classify a single test, independent of how the
/// sandbox produced it.
#[derive(Debug)]
pub struct RunObservation<'a> {
    pub exit_code: i32,
    pub timed_out: bool,
    pub output_path: &'a Path,
    pub expected_output: &'a str,
    pub time_ms: u64,
    pub memory_kb: u64,
}

/// A classification, plus an optional note the caller should append to the
/// test's runtime log (e.g. why an oversized output became a RuntimeError).
#[derive(Debug, PartialEq, Eq)]
pub struct Classification {
    pub status: TestStatus,
    pub note: Option<String>,
}

impl Classification {
    fn plain(status: TestStatus) -> Self {
        Classification { status, note: None }
    }
}

/// Classify one test's outcome.
///
/// Priority order: a timeout always reports `TimeLimitExceeded` regardless
/// of what ended up in the output file; a nonzero exit reports
/// `RuntimeError`; oversized output reports `RuntimeError` with a note
/// naming the offending size; an empty expected output accepts
/// unconditionally (scratch runs have nothing to compare against);
/// otherwise the normalized comparer decides between `Accepted` and
/// `WrongAnswer`.
pub fn classify(observation: &RunObservation) -> Classification {
    if observation.timed_out {
        return Classification::plain(TestStatus::TimeLimitExceeded);
    }

    if observation.exit_code != 0 {
        return Classification::plain(TestStatus::RuntimeError);
    }

    if let Some(size) = oversized_output_bytes(observation.output_path) {
        return Classification {
            status: TestStatus::RuntimeError,
            note: Some(format!("Output limit exceeded: {size} bytes")),
        };
    }

    if observation.expected_output.is_empty() {
        return Classification::plain(TestStatus::Accepted);
    }

    let expected_tmp = write_expected_to_tempfile(observation.expected_output);
    let accepted = crate::comparer::files_equal(observation.output_path, expected_tmp.path());

    Classification::plain(if accepted {
        TestStatus::Accepted
    } else {
        TestStatus::WrongAnswer
    })
}

/// The output's byte size, if it exceeds [`MAX_OUTPUT_BYTES`].
fn oversized_output_bytes(path: &Path) -> Option<u64> {
    std::fs::metadata(path)
        .ok()
        .map(|m| m.len())
        .filter(|&len| len > MAX_OUTPUT_BYTES)
}

fn write_expected_to_tempfile(expected: &str) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut file = tempfile::NamedTempFile::new().expect("create temp file for expected output");
    file.write_all(expected.as_bytes())
        .expect("write expected output to temp file");
    file
}
