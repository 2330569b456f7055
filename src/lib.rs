//! Rule-based tokenizer for Ukrainian text.
//!
//! Text is split into paragraphs (lines), each paragraph into sentences by a
//! whitespace-span heuristic, and each sentence into tokens by an ordered
//! pattern grammar.
//!
//! ```
//! let document = tokenize_uk::tokenize_text("Це вул. Хрещатик. Тут гарно!");
//! assert_eq!(document.sentence_count(), 2);
//!
//! assert_eq!(tokenize_uk::tokenize_words("В.І.Перебийніс"), vec!["В.І.Перебийніс"]);
//! ```

use std::sync::OnceLock;

pub mod document;
pub mod fixtures;
pub mod output;
pub mod paragraph;
pub mod parallel_processing;
pub mod reader;
pub mod sentence_detector;
pub mod stream;
pub mod word_tokenizer;

// Re-export main types for convenient access
pub use document::{TokenizeUk, TokenizedDocument, TokenizerConfig};
pub use paragraph::ParagraphPolicy;
pub use sentence_detector::{DetectedSentence, SentenceRules, SentenceSegmenter};
pub use word_tokenizer::{Token, TokenKind, WordTokenizer};

static DEFAULT_TOKENIZER: OnceLock<TokenizeUk> = OnceLock::new();

/// Process-wide tokenizer with the default configuration, built on first use
pub fn default_tokenizer() -> &'static TokenizeUk {
    DEFAULT_TOKENIZER
        .get_or_init(|| TokenizeUk::new().expect("built-in tokenization grammar must compile"))
}

/// Tokenize text into paragraphs, sentences and words
pub fn tokenize_text(input: &str) -> TokenizedDocument {
    default_tokenizer().tokenize_text(input)
}

/// Split one paragraph line into sentences
pub fn tokenize_sentences(paragraph_line: &str) -> Vec<&str> {
    default_tokenizer().tokenize_sentences(paragraph_line)
}

/// Split one sentence into word tokens
pub fn tokenize_words(sentence: &str) -> Vec<&str> {
    default_tokenizer().tokenize_words(sentence)
}
