// WHY: files are independent, so each one is read, tokenized and written on its own;
// tokenization runs on the blocking pool while reads and writes stay async

use anyhow::Result;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

use crate::document::TokenizeUk;
use crate::output::{write_aux_file, OutputFormat};
use crate::reader::{AsyncFileReader, ReaderConfig};

/// Per-file processing statistics
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FileStats {
    /// Source file path
    pub path: String,
    /// Auxiliary output path, when written
    pub output_path: Option<String>,
    pub bytes_read: u64,
    pub chars_processed: u64,
    pub paragraphs: u64,
    pub sentences_detected: u64,
    pub tokens_emitted: u64,
    /// Wall time for read + tokenize + write
    pub processing_time_ms: u64,
    /// Tokenization time only (subset of processing_time_ms)
    pub tokenization_time_ms: u64,
    pub chars_per_sec: f64,
    /// success or failed
    pub status: String,
    pub error: Option<String>,
}

impl FileStats {
    fn failed(path: &Path, elapsed_ms: u64, error: String) -> Self {
        Self {
            path: path.display().to_string(),
            output_path: None,
            bytes_read: 0,
            chars_processed: 0,
            paragraphs: 0,
            sentences_detected: 0,
            tokens_emitted: 0,
            processing_time_ms: elapsed_ms,
            tokenization_time_ms: 0,
            chars_per_sec: 0.0,
            status: "failed".to_string(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate statistics for a batch run
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RunStats {
    /// Seconds since the Unix epoch
    pub run_start: u64,
    pub total_processing_time_ms: u64,
    pub total_chars_processed: u64,
    pub total_sentences_detected: u64,
    pub total_tokens_emitted: u64,
    pub overall_chars_per_sec: f64,
    pub files_processed: u64,
    pub files_failed: u64,
    pub file_stats: Vec<FileStats>,
}

/// Options for a batch run
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub format: OutputFormat,
    /// Abort on the first failing file instead of recording it
    pub fail_fast: bool,
    /// Read buffer size per file
    pub buffer_size: usize,
    /// Files in flight at once
    pub concurrency: usize,
    pub show_progress: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            fail_fast: false,
            buffer_size: ReaderConfig::default().buffer_size,
            concurrency: num_cpus::get().max(1),
            show_progress: false,
        }
    }
}

impl BatchConfig {
    fn reader_config(&self) -> ReaderConfig {
        ReaderConfig {
            fail_fast: self.fail_fast,
            buffer_size: self.buffer_size,
        }
    }
}

fn chars_per_sec(chars: u64, elapsed_ms: u64) -> f64 {
    if elapsed_ms > 0 {
        chars as f64 / (elapsed_ms as f64 / 1000.0)
    } else {
        chars as f64 * 1000.0
    }
}

/// Read, tokenize and write one file
///
/// Read failures are returned as errors under `fail_fast` and recorded as a
/// failed `FileStats` otherwise; no auxiliary file is written for them.
pub async fn process_file(
    tokenizer: Arc<TokenizeUk>,
    path: &Path,
    format: OutputFormat,
    reader_config: ReaderConfig,
) -> Result<FileStats> {
    let start = Instant::now();
    let reader = AsyncFileReader::new(reader_config);
    let (content, read_stats) = reader.read_document(path).await?;
    if let Some(error) = read_stats.read_error {
        return Ok(FileStats::failed(path, read_stats.duration_ms, error));
    }
    let chars_processed = content.chars().count() as u64;

    let tokenize_start = Instant::now();
    let document = tokio::task::spawn_blocking(move || tokenizer.tokenize_text(&content)).await?;
    let tokenization_time_ms = tokenize_start.elapsed().as_millis() as u64;

    let aux_path = write_aux_file(path, &document, format).await?;
    let processing_time_ms = start.elapsed().as_millis() as u64;

    Ok(FileStats {
        path: path.display().to_string(),
        output_path: Some(aux_path.display().to_string()),
        bytes_read: read_stats.bytes_read,
        chars_processed,
        paragraphs: document.paragraph_count() as u64,
        sentences_detected: document.sentence_count() as u64,
        tokens_emitted: document.token_count() as u64,
        processing_time_ms,
        tokenization_time_ms,
        chars_per_sec: chars_per_sec(chars_processed, tokenization_time_ms),
        status: "success".to_string(),
        error: None,
    })
}

fn progress_bar(len: usize, show: bool) -> Result<ProgressBar> {
    if !show {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(len as u64);
    bar.set_style(ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} files {msg}")?);
    Ok(bar)
}

/// Tokenize many files concurrently; results keep the input order
pub async fn process_files_parallel(
    tokenizer: Arc<TokenizeUk>,
    paths: Vec<PathBuf>,
    config: BatchConfig,
) -> Result<RunStats> {
    let run_start = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let start = Instant::now();
    let progress = progress_bar(paths.len(), config.show_progress)?;

    info!("Processing {} files with concurrency {}", paths.len(), config.concurrency);

    let format = config.format;
    let reader_config = config.reader_config();
    let mut results = stream::iter(paths.into_iter().map(|path| {
        let tokenizer = Arc::clone(&tokenizer);
        let progress = progress.clone();
        let reader_config = reader_config.clone();
        async move {
            let file_start = Instant::now();
            let outcome = process_file(tokenizer, &path, format, reader_config).await;
            progress.inc(1);
            (path, file_start.elapsed().as_millis() as u64, outcome)
        }
    }))
    .buffered(config.concurrency.max(1));

    let mut file_stats = Vec::new();
    while let Some((path, elapsed_ms, outcome)) = results.next().await {
        match outcome {
            Ok(stats) => file_stats.push(stats),
            Err(e) if config.fail_fast => {
                progress.abandon_with_message("aborted");
                return Err(e.context(format!("Failed to process {}", path.display())));
            }
            Err(e) => {
                warn!("Failed to process {}: {:#}", path.display(), e);
                file_stats.push(FileStats::failed(&path, elapsed_ms, format!("{e:#}")));
            }
        }
    }
    progress.finish_with_message("done");

    let total_processing_time_ms = start.elapsed().as_millis() as u64;
    let total_chars_processed = file_stats.iter().map(|s| s.chars_processed).sum();
    let files_failed = file_stats.iter().filter(|s| !s.is_success()).count() as u64;

    let run = RunStats {
        run_start,
        total_processing_time_ms,
        total_chars_processed,
        total_sentences_detected: file_stats.iter().map(|s| s.sentences_detected).sum(),
        total_tokens_emitted: file_stats.iter().map(|s| s.tokens_emitted).sum(),
        overall_chars_per_sec: chars_per_sec(total_chars_processed, total_processing_time_ms),
        files_processed: file_stats.len() as u64 - files_failed,
        files_failed,
        file_stats,
    };

    info!(
        "Batch complete: {} processed, {} failed in {}ms",
        run.files_processed, run.files_failed, run.total_processing_time_ms
    );
    Ok(run)
}

/// Persist run statistics as pretty JSON
pub async fn write_run_stats(path: &Path, stats: &RunStats) -> Result<()> {
    let content = serde_json::to_string_pretty(stats)?;
    tokio::fs::write(path, content).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_process_file_writes_aux_output() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("text.txt");
        std::fs::write(&source, "Це вул. Хрещатик. Тут гарно!").unwrap();

        let tokenizer = Arc::new(TokenizeUk::new().unwrap());
        let stats = process_file(tokenizer, &source, OutputFormat::Lines, ReaderConfig::default())
            .await
            .unwrap();

        assert!(stats.is_success());
        assert_eq!(stats.bytes_read, "Це вул. Хрещатик. Тут гарно!".len() as u64);
        assert_eq!(stats.paragraphs, 1);
        assert_eq!(stats.sentences_detected, 2);
        assert_eq!(stats.tokens_emitted, 8);

        let output = std::fs::read_to_string(stats.output_path.unwrap()).unwrap();
        assert_eq!(output, "Це вул . Хрещатик .\nТут гарно !\n\n");
    }

    #[tokio::test]
    async fn test_process_file_read_failure_modes() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("invalid.txt");
        std::fs::write(&source, [0xFF, 0xFE]).unwrap();
        let tokenizer = Arc::new(TokenizeUk::new().unwrap());

        let stats = process_file(Arc::clone(&tokenizer), &source, OutputFormat::Json, ReaderConfig::default())
            .await
            .unwrap();
        assert!(!stats.is_success());
        assert_eq!(stats.status, "failed");
        assert!(stats.output_path.is_none());
        assert!(!crate::output::aux_file_exists(&source, OutputFormat::Json));

        let strict = ReaderConfig {
            fail_fast: true,
            ..Default::default()
        };
        assert!(process_file(tokenizer, &source, OutputFormat::Json, strict).await.is_err());
    }

    #[tokio::test]
    async fn test_batch_records_failures() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good.txt");
        std::fs::write(&good, "Так.").unwrap();
        let missing = temp_dir.path().join("missing.txt");

        let tokenizer = Arc::new(TokenizeUk::new().unwrap());
        let run = process_files_parallel(tokenizer, vec![good.clone(), missing], BatchConfig::default())
            .await
            .unwrap();

        assert_eq!(run.files_processed, 1);
        assert_eq!(run.files_failed, 1);
        assert_eq!(run.file_stats[0].path, good.display().to_string());
        assert_eq!(run.file_stats[1].status, "failed");
        assert!(run.file_stats[1].error.is_some());
    }

    #[tokio::test]
    async fn test_batch_fail_fast() {
        let temp_dir = TempDir::new().unwrap();
        let tokenizer = Arc::new(TokenizeUk::new().unwrap());
        let config = BatchConfig {
            fail_fast: true,
            ..Default::default()
        };

        let result = process_files_parallel(tokenizer, vec![temp_dir.path().join("missing.txt")], config).await;
        assert!(result.is_err());
    }
}
