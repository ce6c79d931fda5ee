//! Tolerant textual equality between a captured output file and an expected
//! output file.
//!
//! Strict byte equality produces false negatives for student programs that
//! emit platform-dependent line endings or trailing whitespace, so
//! comparison is normalized: carriage returns are stripped, trailing
//! spaces/tabs on each line are stripped, and trailing empty lines are
//! dropped before the two line sequences are compared.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Returns `true` if the two files are equal under tolerant normalization.
/// A file that cannot be opened compares unequal to anything — absence is
/// treated as a failure to produce output, not an error.
pub fn files_equal(actual: &Path, expected: &Path) -> bool {
    let actual_lines = normalized_lines(actual);
    let expected_lines = normalized_lines(expected);
    actual_lines == expected_lines
}

/// Read a file into its normalized line sequence. Returns an empty vector
/// (never an error) if the file cannot be opened.
fn normalized_lines(path: &Path) -> Vec<String> {
    let Ok(file) = File::open(path) else {
        return Vec::new();
    };

    let mut lines: Vec<String> = BufReader::new(file)
        .lines()
        .map_while(Result::ok)
        .map(|line| trim_trailing(&line))
        .collect();

    while matches!(lines.last(), Some(last) if last.is_empty()) {
        lines.pop();
    }

    lines
}

/// Strip a trailing `\r` (in case the reader left one) plus trailing spaces
/// and tabs.
fn trim_trailing(line: &str) -> String {
    line.trim_end_matches(['\r', ' ', '\t']).to_string()
}
