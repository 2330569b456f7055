// WHY: a period after one of these never closes a sentence, even before a capital
// Matching is exact and case-sensitive on the whole span, trailing period included

use std::collections::HashSet;

/// Abbreviations that are followed by a proper noun often enough that the period
/// must not be read as a sentence end ("вул. Хрещатик", "м. Київ", "ім. Шевченка")
pub const UKRAINIAN_ABBREVIATIONS: &[&str] = &[
    "ім.", "о.", "вул.", "просп.", "бул.", "пров.", "пл.", "г.", "р.", "див.", "п.", "с.", "м.",
];

/// O(1) abbreviation lookup over an owned set of literals
#[derive(Debug, Clone)]
pub struct AbbreviationChecker {
    abbreviations: HashSet<String>,
}

impl AbbreviationChecker {
    /// Create checker with the built-in Ukrainian abbreviation set
    pub fn new() -> Self {
        Self::from_entries(UKRAINIAN_ABBREVIATIONS.iter().copied())
    }

    /// Create checker from arbitrary entries; blank entries are ignored
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let abbreviations = entries
            .into_iter()
            .map(|entry| entry.as_ref().trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect();
        Self { abbreviations }
    }

    /// Parse a whitespace-separated abbreviation list (one per line in practice)
    pub fn parse_list(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    /// Check if a span is a known abbreviation
    pub fn is_abbreviation(&self, word: &str) -> bool {
        self.abbreviations.contains(word)
    }

    pub fn len(&self) -> usize {
        self.abbreviations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abbreviations.is_empty()
    }
}

impl Default for AbbreviationChecker {
    fn default() -> Self {
        Self::new()
    }
}
