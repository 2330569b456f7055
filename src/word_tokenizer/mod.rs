// WHY: tokens are borrowed slices of the sentence; characters no rule covers
// (whitespace, unexpected symbols) are skipped and never surface as tokens

use anyhow::Result;
use tracing::{debug, info};

pub mod grammar;

pub use grammar::{Grammar, TokenKind};

/// A token borrowed from the sentence it was matched in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    /// Byte offset of the token within the sentence
    pub start: usize,
    pub kind: TokenKind,
}

impl<'a> Token<'a> {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Longest-match scanner over the ordered word grammar
#[derive(Debug)]
pub struct WordTokenizer {
    grammar: Grammar,
}

impl WordTokenizer {
    pub fn new() -> Result<Self> {
        info!("Compiling word tokenization grammar");
        let grammar = Grammar::compile()?;
        debug!("Compiled {} grammar rules", grammar.rules().len());
        Ok(Self { grammar })
    }

    /// Scan the sentence left to right, emitting non-overlapping tokens
    pub fn tokens<'a>(&self, sentence: &'a str) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        let mut pos = 0;
        let mut skipped = 0usize;

        while pos < sentence.len() {
            match self.grammar.longest_match_at(sentence, pos) {
                Some((kind, len)) => {
                    tokens.push(Token {
                        text: &sentence[pos..pos + len],
                        start: pos,
                        kind,
                    });
                    pos += len;
                }
                None => {
                    // Advance one whole character to stay on a UTF-8 boundary
                    let ch_len = sentence[pos..].chars().next().map_or(1, char::len_utf8);
                    if !sentence[pos..pos + ch_len].trim().is_empty() {
                        skipped += 1;
                    }
                    pos += ch_len;
                }
            }
        }

        if skipped > 0 {
            debug!("Dropped {} unmatched characters", skipped);
        }
        tokens
    }

    /// Token texts only
    pub fn words<'a>(&self, sentence: &'a str) -> Vec<&'a str> {
        self.tokens(sentence).into_iter().map(|token| token.text).collect()
    }
}
