// WHY: sentence boundaries are only ever placed between whitespace-delimited spans,
// so a sentence is always a borrowed slice of the paragraph line

use anyhow::Result;
use regex_automata::meta::Regex;
use tracing::{debug, info};

pub mod abbreviations;

pub use abbreviations::{AbbreviationChecker, UKRAINIAN_ABBREVIATIONS};

/// Characters that make a span a candidate sentence end
pub const SENTENCE_ENDINGS: &[char] = &['.', '!', '?', '…', '»'];

/// Half-open byte range into the segmented text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// Maximal run of non-whitespace characters, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhitespaceSpan {
    pub start: usize,
    pub len: usize,
}

impl WhitespaceSpan {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end()
    }
}

/// Sentence borrowed from the source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedSentence<'a> {
    pub index: usize,
    pub raw_content: &'a str,
    pub span: Span,
}

impl<'a> DetectedSentence<'a> {
    fn new(index: usize, line: &'a str, start: usize, end: usize) -> Self {
        Self {
            index,
            raw_content: &line[start..end],
            span: Span::new(start, end),
        }
    }

    pub fn raw(&self) -> &'a str {
        self.raw_content
    }
}

/// Configuration for sentence boundary detection rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceRules {
    /// Last characters that make a span a boundary candidate
    pub endings: Vec<char>,
    /// Period-terminated literals that never end a sentence
    pub abbreviations: Vec<String>,
}

impl Default for SentenceRules {
    fn default() -> Self {
        Self {
            endings: SENTENCE_ENDINGS.to_vec(),
            abbreviations: UKRAINIAN_ABBREVIATIONS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl SentenceRules {
    /// Add entries from a whitespace-separated abbreviation list
    pub fn with_extra_abbreviations(mut self, list: &str) -> Self {
        for abbr in AbbreviationChecker::parse_list(list) {
            if !self.abbreviations.contains(&abbr) {
                self.abbreviations.push(abbr);
            }
        }
        self
    }
}

/// Uppercase by case mapping: maps to itself when uppercased and changes when lowercased
pub fn is_uppercase(c: char) -> bool {
    let mut upper = c.to_uppercase();
    let maps_to_self = upper.next() == Some(c) && upper.next().is_none();
    let mut lower = c.to_lowercase();
    let lower_is_self = lower.next() == Some(c) && lower.next().is_none();
    maps_to_self && !lower_is_self
}

/// Whitespace-span sentence segmenter for a single paragraph line
#[derive(Debug)]
pub struct SentenceSegmenter {
    spans: Regex,
    endings: Vec<char>,
    abbreviations: AbbreviationChecker,
}

impl SentenceSegmenter {
    /// Create new segmenter with custom rules
    pub fn new(rules: SentenceRules) -> Result<Self> {
        info!(
            "Building sentence segmenter with {} endings and {} abbreviations",
            rules.endings.len(),
            rules.abbreviations.len()
        );

        Ok(Self {
            spans: Regex::new(r"\S+")?,
            endings: rules.endings,
            abbreviations: AbbreviationChecker::from_entries(rules.abbreviations),
        })
    }

    /// Create segmenter with default rules
    pub fn with_default_rules() -> Result<Self> {
        Self::new(SentenceRules::default())
    }

    pub fn abbreviations(&self) -> &AbbreviationChecker {
        &self.abbreviations
    }

    /// Scan the line left to right for maximal non-whitespace spans
    pub fn whitespace_spans(&self, line: &str) -> Vec<WhitespaceSpan> {
        self.spans
            .find_iter(line)
            .map(|m| WhitespaceSpan {
                start: m.start(),
                len: m.len(),
            })
            .collect()
    }

    /// Split a paragraph line into sentences; always returns at least one
    pub fn detect_sentences<'a>(&self, line: &'a str) -> Vec<DetectedSentence<'a>> {
        let spans = self.whitespace_spans(line);

        // Blank line: the whole line is the single sentence
        if spans.is_empty() {
            return vec![DetectedSentence::new(0, line, 0, line.len())];
        }

        let mut sentences = Vec::new();
        let mut off = 0;

        for (i, span) in spans.iter().enumerate() {
            let Some(next) = spans.get(i + 1) else {
                sentences.push(DetectedSentence::new(sentences.len(), line, off, span.end()));
                break;
            };

            if self.is_boundary(&line[span.range()], &line[next.range()]) {
                sentences.push(DetectedSentence::new(sentences.len(), line, off, span.end()));
                // Resume at the start of the next span; the gap is pure whitespace
                off = next.start;
            }
        }

        debug!("Segmented {} spans into {} sentences", spans.len(), sentences.len());
        sentences
    }

    /// Sentence texts only
    pub fn sentences<'a>(&self, line: &'a str) -> Vec<&'a str> {
        self.detect_sentences(line)
            .into_iter()
            .map(|sentence| sentence.raw_content)
            .collect()
    }

    /// Decide whether a sentence ends after `tok` given the span that follows it
    fn is_boundary(&self, tok: &str, next_tok: &str) -> bool {
        let mut chars = tok.chars().rev();
        let Some(last) = chars.next() else {
            return false;
        };
        if !self.endings.contains(&last) {
            return false;
        }
        let penultimate = chars.next();

        let next_is_capitalized = next_tok.chars().next().is_some_and(is_uppercase);
        // Runs of capital initials ("Т.Г. Шевченко") stay in one sentence
        if !next_is_capitalized || penultimate.is_some_and(is_uppercase) {
            return false;
        }

        // Only a period closes a sentence; "!", "?", "…" and "»" never do
        last == '.' && !next_tok.starts_with('(') && !self.abbreviations.is_abbreviation(tok)
    }
}
