// Golden-file fixtures: {"Source": "...", "Result": [[["..."]]]}

use anyhow::{Context, Result};
use glob::{glob, Pattern};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::document::{TokenizeUk, TokenizedDocument};

/// Source text and its expected tokenization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenFixture {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Result")]
    pub result: TokenizedDocument,
}

/// Result of comparing a fixture against the tokenizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureOutcome {
    Match,
    Mismatch {
        /// Human-readable location of the first difference
        location: String,
        expected: String,
        actual: String,
    },
}

impl FixtureOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, FixtureOutcome::Match)
    }
}

pub fn parse_fixture(json: &str) -> Result<GoldenFixture> {
    serde_json::from_str(json).context("Invalid golden fixture JSON")
}

pub fn load_fixture<P: AsRef<Path>>(path: P) -> Result<GoldenFixture> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture {}", path.display()))?;
    parse_fixture(&json).with_context(|| format!("Failed to parse fixture {}", path.display()))
}

/// All `*.json` files directly under `dir`, sorted by path
pub fn discover_fixtures<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        anyhow::bail!("Fixture directory does not exist: {}", dir.display());
    }

    let dir_str = dir
        .to_str()
        .with_context(|| format!("Fixture directory is not valid UTF-8: {}", dir.display()))?;
    // Metacharacters in the directory name itself must match literally
    let pattern = format!("{}/*.json", Pattern::escape(dir_str));

    let mut paths = glob(&pattern)?.collect::<Result<Vec<_>, _>>()?;
    paths.sort();

    info!("Discovered {} fixtures in {}", paths.len(), dir.display());
    Ok(paths)
}

/// Tokenize the fixture source and compare with the expected result
pub fn check_fixture(tokenizer: &TokenizeUk, fixture: &GoldenFixture) -> FixtureOutcome {
    let actual = tokenizer.tokenize_text(&fixture.source);
    let outcome = first_difference(fixture.result.paragraphs(), actual.paragraphs());
    debug!(matched = outcome.is_match(), "Checked fixture");
    outcome
}

fn first_difference(expected: &[Vec<Vec<String>>], actual: &[Vec<Vec<String>>]) -> FixtureOutcome {
    if expected.len() != actual.len() {
        return FixtureOutcome::Mismatch {
            location: "document".to_string(),
            expected: format!("{} paragraphs", expected.len()),
            actual: format!("{} paragraphs", actual.len()),
        };
    }

    for (p, (expected_par, actual_par)) in expected.iter().zip(actual).enumerate() {
        if expected_par.len() != actual_par.len() {
            return FixtureOutcome::Mismatch {
                location: format!("paragraph {p}"),
                expected: format!("{} sentences", expected_par.len()),
                actual: format!("{} sentences", actual_par.len()),
            };
        }
        for (s, (expected_sent, actual_sent)) in expected_par.iter().zip(actual_par).enumerate() {
            if expected_sent != actual_sent {
                return FixtureOutcome::Mismatch {
                    location: format!("paragraph {p}, sentence {s}"),
                    expected: format!("{expected_sent:?}"),
                    actual: format!("{actual_sent:?}"),
                };
            }
        }
    }

    FixtureOutcome::Match
}
