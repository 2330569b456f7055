// Paragraph -> sentence -> word pipeline and its nested output

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::paragraph::{split_paragraphs, ParagraphPolicy};
use crate::sentence_detector::{SentenceRules, SentenceSegmenter};
use crate::word_tokenizer::WordTokenizer;

/// Configuration for the whole tokenization pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizerConfig {
    pub paragraphs: ParagraphPolicy,
    pub rules: SentenceRules,
}

/// Paragraphs of sentences of tokens
///
/// Serializes as a bare three-level array of strings, the same shape as the
/// `Result` field of the golden fixtures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenizedDocument {
    paragraphs: Vec<Vec<Vec<String>>>,
}

impl TokenizedDocument {
    pub fn new(paragraphs: Vec<Vec<Vec<String>>>) -> Self {
        Self { paragraphs }
    }

    pub fn paragraphs(&self) -> &[Vec<Vec<String>>] {
        &self.paragraphs
    }

    pub fn into_inner(self) -> Vec<Vec<Vec<String>>> {
        self.paragraphs
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn sentence_count(&self) -> usize {
        self.paragraphs.iter().map(Vec::len).sum()
    }

    pub fn token_count(&self) -> usize {
        self.paragraphs
            .iter()
            .flat_map(|paragraph| paragraph.iter().map(Vec::len))
            .sum()
    }

    /// One sentence per line with tokens joined by a space, a blank line after each paragraph
    pub fn to_lines(&self) -> String {
        let mut out = String::new();
        for paragraph in &self.paragraphs {
            for sentence in paragraph {
                out.push_str(&sentence.join(" "));
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }
}

/// Configured tokenizer; immutable after construction and shareable across threads
#[derive(Debug)]
pub struct TokenizeUk {
    paragraphs: ParagraphPolicy,
    segmenter: SentenceSegmenter,
    words: WordTokenizer,
}

impl TokenizeUk {
    /// Tokenizer with the built-in abbreviation set, keeping empty paragraphs
    pub fn new() -> Result<Self> {
        Self::with_config(TokenizerConfig::default())
    }

    pub fn with_config(config: TokenizerConfig) -> Result<Self> {
        Ok(Self {
            paragraphs: config.paragraphs,
            segmenter: SentenceSegmenter::new(config.rules)?,
            words: WordTokenizer::new()?,
        })
    }

    pub fn paragraph_policy(&self) -> ParagraphPolicy {
        self.paragraphs
    }

    pub fn segmenter(&self) -> &SentenceSegmenter {
        &self.segmenter
    }

    pub fn word_tokenizer(&self) -> &WordTokenizer {
        &self.words
    }

    /// Full paragraph / sentence / word structure
    pub fn tokenize_text(&self, input: &str) -> TokenizedDocument {
        let paragraphs: Vec<Vec<Vec<String>>> = split_paragraphs(input, self.paragraphs)
            .into_iter()
            .map(|line| self.tokenize_paragraph(line))
            .collect();

        let document = TokenizedDocument::new(paragraphs);
        debug!(
            paragraphs = document.paragraph_count(),
            sentences = document.sentence_count(),
            tokens = document.token_count(),
            "Tokenized text of {} bytes",
            input.len()
        );
        document
    }

    /// Sentences of one paragraph, each as owned tokens
    pub fn tokenize_paragraph(&self, line: &str) -> Vec<Vec<String>> {
        self.segmenter
            .sentences(line)
            .into_iter()
            .map(|sentence| {
                self.words
                    .words(sentence)
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .collect()
    }

    pub fn tokenize_sentences<'a>(&self, paragraph_line: &'a str) -> Vec<&'a str> {
        self.segmenter.sentences(paragraph_line)
    }

    pub fn tokenize_words<'a>(&self, sentence: &'a str) -> Vec<&'a str> {
        self.words.words(sentence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer() -> TokenizeUk {
        TokenizeUk::new().unwrap()
    }

    #[test]
    fn test_nested_shape() {
        let text = "Один два три. Чотири пʼять шість.\nСім вісім девʼять. Десять одинадцять дванадцять.";
        let document = tokenizer().tokenize_text(text);

        assert_eq!(document.paragraph_count(), 2);
        for paragraph in document.paragraphs() {
            assert_eq!(paragraph.len(), 2);
            for sentence in paragraph {
                // Three words plus the closing period
                assert_eq!(sentence.len(), 4);
                assert_eq!(sentence.last().map(String::as_str), Some("."));
            }
        }
        assert_eq!(document.sentence_count(), 4);
        assert_eq!(document.token_count(), 16);
    }

    #[test]
    fn test_exclamation_and_question_stay_in_sentence() {
        let text = "Один два три! Чотири пʼять шість\nСім вісім девʼять? Десять. Одинадцять";
        let document = tokenizer().tokenize_text(text);
        let shape: Vec<Vec<usize>> = document
            .paragraphs()
            .iter()
            .map(|p| p.iter().map(Vec::len).collect())
            .collect();
        assert_eq!(shape, vec![vec![7], vec![6, 1]]);
    }

    #[test]
    fn test_empty_input_policies() {
        let keep = tokenizer().tokenize_text("");
        assert_eq!(keep.into_inner(), vec![vec![Vec::<String>::new()]]);

        let config = TokenizerConfig {
            paragraphs: ParagraphPolicy::SkipBlank,
            ..Default::default()
        };
        let skip = TokenizeUk::with_config(config).unwrap().tokenize_text("\n  \n");
        assert_eq!(skip.paragraph_count(), 0);
    }

    #[test]
    fn test_whitespace_and_single_character_inputs() {
        let document = tokenizer().tokenize_text("   ");
        assert_eq!(document.into_inner(), vec![vec![Vec::<String>::new()]]);

        let document = tokenizer().tokenize_text("я");
        assert_eq!(document.into_inner(), vec![vec![vec!["я".to_string()]]]);
    }

    #[test]
    fn test_serializes_as_bare_nested_array() {
        let document = tokenizer().tokenize_text("Так. Ні.");
        let json = serde_json::to_string(&document).unwrap();
        assert_eq!(json, r#"[[["Так","."],["Ні","."]]]"#);

        let parsed: TokenizedDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, document);
    }

    #[test]
    fn test_lines_format() {
        let document = tokenizer().tokenize_text("Так, звісно. Ні!\n\nКінець");
        assert_eq!(document.to_lines(), "Так , звісно .\nНі !\n\n\n\nКінець\n\n");
    }
}
