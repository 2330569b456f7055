use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, BufReader};
use tracing::{debug, info, warn};

/// Configuration for file reading behavior
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
    /// Buffer size for async reading (default: 8KB)
    pub buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            buffer_size: 8192,
        }
    }
}

/// Statistics for file reading operations
#[derive(Debug, Clone)]
pub struct ReadStats {
    pub file_path: String,
    pub lines_read: u64,
    pub bytes_read: u64,
    pub duration_ms: u64,
    pub read_error: Option<String>,
}

impl ReadStats {
    fn failed(path: &Path, duration_ms: u64, error: String) -> Self {
        Self {
            file_path: path.display().to_string(),
            lines_read: 0,
            bytes_read: 0,
            duration_ms,
            read_error: Some(error),
        }
    }
}

/// Async reader for whole UTF-8 documents
pub struct AsyncFileReader {
    config: ReaderConfig,
}

impl AsyncFileReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read a document with buffered async I/O
    ///
    /// With `fail_fast` unset, open and decoding errors are reported through
    /// `ReadStats::read_error` and an empty document is returned.
    pub async fn read_document<P: AsRef<Path>>(&self, file_path: P) -> Result<(String, ReadStats)> {
        let path = file_path.as_ref();
        let start_time = std::time::Instant::now();

        debug!("Starting async read of file: {}", path.display());

        let outcome = self.read_inner(path).await;
        let duration_ms = start_time.elapsed().as_millis() as u64;

        match outcome {
            Ok(content) => {
                let stats = ReadStats {
                    file_path: path.display().to_string(),
                    lines_read: crate::paragraph::lines(&content).count() as u64,
                    bytes_read: content.len() as u64,
                    duration_ms,
                    read_error: None,
                };
                info!(
                    "Successfully read {}: {} lines, {} bytes in {}ms",
                    path.display(),
                    stats.lines_read,
                    stats.bytes_read,
                    stats.duration_ms
                );
                Ok((content, stats))
            }
            Err(e) => {
                let error_msg = format!("{e:#}");
                warn!("{}", error_msg);
                if self.config.fail_fast {
                    Err(e)
                } else {
                    Ok((String::new(), ReadStats::failed(path, duration_ms, error_msg)))
                }
            }
        }
    }

    async fn read_inner(&self, path: &Path) -> Result<String> {
        let file = File::open(path)
            .await
            .with_context(|| format!("Failed to open file {}", path.display()))?;

        let mut reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .await
            .with_context(|| format!("Failed to read file {}", path.display()))?;

        String::from_utf8(bytes).with_context(|| format!("UTF-8 decoding error in {}", path.display()))
    }
}
