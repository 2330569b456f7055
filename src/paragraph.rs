// Paragraphs are the lines of the input; "\r\n", "\r" and "\n" all end a line

use serde::{Deserialize, Serialize};

/// What to do with lines that contain no text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphPolicy {
    /// Every line is a paragraph; empty input is one empty paragraph
    #[default]
    KeepEmpty,
    /// Drop empty and whitespace-only lines; empty input has no paragraphs
    SkipBlank,
}

/// Iterator over the lines of a text, recognizing all three line-break styles
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: Option<&'a str>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;
        match rest.find(|c| c == '\r' || c == '\n') {
            Some(pos) => {
                let break_len = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
                self.rest = Some(&rest[pos + break_len..]);
                Some(&rest[..pos])
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}

/// Lines of `text` in order, empty lines included; always yields at least one line
pub fn lines(text: &str) -> Lines<'_> {
    Lines { rest: Some(text) }
}

/// Split text into paragraphs under the given policy
pub fn split_paragraphs(text: &str, policy: ParagraphPolicy) -> Vec<&str> {
    lines(text)
        .filter(|line| keep_line(line, policy))
        .collect()
}

/// Whether a single line survives the policy
pub fn keep_line(line: &str, policy: ParagraphPolicy) -> bool {
    match policy {
        ParagraphPolicy::KeepEmpty => true,
        ParagraphPolicy::SkipBlank => !line.trim().is_empty(),
    }
}
