// Auxiliary output files written next to each tokenized source

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::document::TokenizedDocument;

/// Serialization of a tokenized document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Nested JSON array, same shape as a fixture `Result`
    #[default]
    Json,
    /// One sentence per line, tokens separated by spaces, blank line between paragraphs
    Lines,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Lines => "txt",
        }
    }

    pub fn render(self, document: &TokenizedDocument) -> Result<String> {
        match self {
            OutputFormat::Json => {
                let mut json = serde_json::to_string_pretty(document)?;
                json.push('\n');
                Ok(json)
            }
            OutputFormat::Lines => Ok(document.to_lines()),
        }
    }
}

/// `book.txt` -> `book_tokens.json` (or `.txt`) in the same directory
pub fn generate_aux_file_path(source_path: &Path, format: OutputFormat) -> PathBuf {
    let mut aux_path = source_path.to_path_buf();
    let file_stem = aux_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    aux_path.set_file_name(format!("{file_stem}_tokens.{}", format.extension()));
    aux_path
}

pub fn aux_file_exists<P: AsRef<Path>>(source_path: P, format: OutputFormat) -> bool {
    generate_aux_file_path(source_path.as_ref(), format).exists()
}

/// Write the document next to its source and return the auxiliary path
pub async fn write_aux_file(
    source_path: &Path,
    document: &TokenizedDocument,
    format: OutputFormat,
) -> Result<PathBuf> {
    let aux_path = generate_aux_file_path(source_path, format);
    let rendered = format.render(document)?;

    let file = tokio::fs::File::create(&aux_path)
        .await
        .with_context(|| format!("Failed to create {}", aux_path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(rendered.as_bytes()).await?;
    writer.flush().await?;

    Ok(aux_path)
}
