// Integration test utilities and common code
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokenize_uk::output::{generate_aux_file_path, OutputFormat};

/// Temporary directory holding source texts for a test
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self { temp_dir, root_path }
    }

    /// Create a source text file, including parent directories
    pub fn create_text_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    pub fn aux_file_exists<P: AsRef<Path>>(&self, source_path: P, format: OutputFormat) -> bool {
        generate_aux_file_path(source_path.as_ref(), format).exists()
    }

    pub fn read_aux_file<P: AsRef<Path>>(&self, source_path: P, format: OutputFormat) -> Result<String, std::io::Error> {
        fs::read_to_string(generate_aux_file_path(source_path.as_ref(), format))
    }
}

/// Directory of the golden JSON fixtures shipped with the crate
pub fn golden_fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Compare two strings line by line, providing detailed diff on mismatch
pub fn assert_golden_file(actual: &str, expected: &str, context: &str) {
    let actual_lines: Vec<&str> = actual.lines().collect();
    let expected_lines: Vec<&str> = expected.lines().collect();

    for (i, (actual_line, expected_line)) in actual_lines.iter().zip(expected_lines.iter()).enumerate() {
        if actual_line != expected_line {
            panic!(
                "{}: Line {} mismatch\nExpected: {}\nActual:   {}",
                context,
                i + 1,
                expected_line,
                actual_line
            );
        }
    }

    if actual_lines.len() != expected_lines.len() {
        panic!(
            "{}: Line count mismatch. Expected {} lines, got {} lines",
            context,
            expected_lines.len(),
            actual_lines.len()
        );
    }
}
