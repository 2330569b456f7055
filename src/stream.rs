// Line-in, sentence-per-line-out adapter over the tokenizer
// Each input line is handled on its own; nothing is carried between lines

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio_stream::{wrappers::LinesStream, StreamExt};
use tracing::{debug, info};

use crate::document::TokenizeUk;
use crate::paragraph::split_paragraphs;

/// Counters for one streaming run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub lines_read: u64,
    pub paragraphs_written: u64,
    pub sentences_written: u64,
    pub tokens_written: u64,
}

/// Read lines from `reader` and write each sentence's tokens, space-joined, on its own line
///
/// A blank line follows every paragraph. Lines dropped by the tokenizer's
/// paragraph policy produce no output. A final line break does not start another
/// line here, whereas `TokenizeUk::tokenize_text` keeps the empty paragraph after
/// it under `ParagraphPolicy::KeepEmpty`.
pub async fn tokenize_stream<R, W>(tokenizer: &TokenizeUk, reader: R, writer: W) -> Result<StreamStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = LinesStream::new(reader.lines());
    let mut writer = BufWriter::new(writer);
    let mut stats = StreamStats::default();
    let policy = tokenizer.paragraph_policy();

    while let Some(line) = lines.next().await {
        let line = line?;
        stats.lines_read += 1;

        // `lines()` only breaks on "\n"; a lone "\r" still separates paragraphs
        for paragraph in split_paragraphs(&line, policy) {
            for sentence in tokenizer.tokenize_sentences(paragraph) {
                let words = tokenizer.tokenize_words(sentence);
                stats.tokens_written += words.len() as u64;
                stats.sentences_written += 1;

                writer.write_all(words.join(" ").as_bytes()).await?;
                writer.write_all(b"\n").await?;
            }
            writer.write_all(b"\n").await?;
            stats.paragraphs_written += 1;
        }

        debug!("Streamed line {}", stats.lines_read);
    }

    writer.flush().await?;
    info!(
        "Streamed {} lines: {} sentences, {} tokens",
        stats.lines_read, stats.sentences_written, stats.tokens_written
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TokenizerConfig;
    use crate::paragraph::ParagraphPolicy;

    async fn run(tokenizer: &TokenizeUk, input: &str) -> (String, StreamStats) {
        let mut output = Vec::new();
        let stats = tokenize_stream(tokenizer, input.as_bytes(), &mut output)
            .await
            .unwrap();
        (String::from_utf8(output).unwrap(), stats)
    }

    #[tokio::test]
    async fn test_stream_format() {
        let tokenizer = TokenizeUk::new().unwrap();
        let (output, stats) = run(&tokenizer, "Це вул. Хрещатик. Тут гарно!\nДругий абзац.\n").await;

        assert_eq!(
            output,
            "Це вул . Хрещатик .\nТут гарно !\n\nДругий абзац .\n\n"
        );
        assert_eq!(stats.lines_read, 2);
        assert_eq!(stats.paragraphs_written, 2);
        assert_eq!(stats.sentences_written, 3);
        assert_eq!(stats.tokens_written, 11);
    }

    #[tokio::test]
    async fn test_stream_matches_tokenize_text() {
        let tokenizer = TokenizeUk::new().unwrap();
        let text = "Пишіть на info@lang.org.ua щодня. Дякуємо!\n\nВ.І.Перебийніс, 20-річний досвід.";
        let (output, _) = run(&tokenizer, text).await;

        assert_eq!(output, tokenizer.tokenize_text(text).to_lines());
    }

    #[tokio::test]
    async fn test_stream_skips_blank_lines_under_policy() {
        let config = TokenizerConfig {
            paragraphs: ParagraphPolicy::SkipBlank,
            ..Default::default()
        };
        let tokenizer = TokenizeUk::with_config(config).unwrap();
        let (output, stats) = run(&tokenizer, "Перший.\n\n   \nДругий.\r\n").await;

        assert_eq!(output, "Перший .\n\nДругий .\n\n");
        assert_eq!(stats.lines_read, 4);
        assert_eq!(stats.paragraphs_written, 2);
    }

    #[tokio::test]
    async fn test_stream_empty_input() {
        let tokenizer = TokenizeUk::new().unwrap();
        let (output, stats) = run(&tokenizer, "").await;

        assert!(output.is_empty());
        assert_eq!(stats, StreamStats::default());
    }
}
