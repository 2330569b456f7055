use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn, Level};

use tokenize_uk::fixtures::{check_fixture, discover_fixtures, load_fixture, FixtureOutcome};
use tokenize_uk::output::OutputFormat;
use tokenize_uk::parallel_processing::{process_files_parallel, write_run_stats, BatchConfig};
use tokenize_uk::stream::tokenize_stream;
use tokenize_uk::{ParagraphPolicy, SentenceRules, TokenizeUk, TokenizerConfig};

#[derive(Parser, Debug)]
#[command(name = "tokenize-uk")]
#[command(about = "Rule-based paragraph, sentence and word tokenizer for Ukrainian text")]
#[command(version)]
struct Args {
    /// Drop empty and whitespace-only lines instead of emitting empty paragraphs
    #[arg(long, global = true)]
    skip_blank: bool,

    /// Whitespace-separated list of extra abbreviations (e.g. "тис. млн.")
    #[arg(long, global = true, value_name = "FILE")]
    abbreviations: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tokenize files (or stdin when no files are given)
    Tokenize {
        /// Source files; each gets a `<stem>_tokens.<ext>` file next to it
        files: Vec<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Abort on first error
        #[arg(long)]
        fail_fast: bool,

        /// Suppress the progress bar
        #[arg(long)]
        no_progress: bool,

        /// Per-file statistics output path
        #[arg(long)]
        stats_out: Option<PathBuf>,
    },
    /// Verify golden fixtures in a directory
    Check {
        /// Directory containing `*.json` fixtures
        dir: PathBuf,
    },
}

fn load_config(args: &Args) -> Result<TokenizerConfig> {
    let mut rules = SentenceRules::default();
    if let Some(path) = &args.abbreviations {
        let list = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read abbreviation list {}", path.display()))?;
        rules = rules.with_extra_abbreviations(&list);
        info!("Loaded abbreviations from {}", path.display());
    }

    let paragraphs = if args.skip_blank {
        ParagraphPolicy::SkipBlank
    } else {
        ParagraphPolicy::KeepEmpty
    };

    Ok(TokenizerConfig { paragraphs, rules })
}

async fn tokenize_stdin(tokenizer: &TokenizeUk, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Lines => {
            let stats = tokenize_stream(tokenizer, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
            info!(?stats, "Finished streaming stdin");
        }
        OutputFormat::Json => {
            let mut input = String::new();
            tokio::io::stdin()
                .read_to_string(&mut input)
                .await
                .context("Failed to read stdin as UTF-8")?;
            let rendered = format.render(&tokenizer.tokenize_text(&input))?;
            let mut stdout = tokio::io::stdout();
            stdout.write_all(rendered.as_bytes()).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}

async fn tokenize_files(
    tokenizer: TokenizeUk,
    files: Vec<PathBuf>,
    config: BatchConfig,
    stats_out: Option<&Path>,
) -> Result<()> {
    // WHY: validate inputs early so a typo fails before any output is written
    if config.fail_fast {
        if let Some(missing) = files.iter().find(|path| !path.is_file()) {
            anyhow::bail!("Input file does not exist: {}", missing.display());
        }
    }

    let run = process_files_parallel(Arc::new(tokenizer), files, config).await?;

    if let Some(path) = stats_out {
        write_run_stats(path, &run).await?;
        info!("Run statistics written to {}", path.display());
    }

    println!(
        "Processed {} files ({} failed): {} sentences, {} tokens in {}ms",
        run.files_processed + run.files_failed,
        run.files_failed,
        run.total_sentences_detected,
        run.total_tokens_emitted,
        run.total_processing_time_ms
    );

    if run.files_failed > 0 {
        anyhow::bail!("{} files failed to tokenize", run.files_failed);
    }
    Ok(())
}

fn check_fixtures(tokenizer: &TokenizeUk, dir: &Path) -> Result<()> {
    let paths = discover_fixtures(dir)?;
    if paths.is_empty() {
        anyhow::bail!("No fixtures found in {}", dir.display());
    }

    let mut failures = 0usize;
    for path in &paths {
        let fixture = load_fixture(path)?;
        match check_fixture(tokenizer, &fixture) {
            FixtureOutcome::Match => println!("ok       {}", path.display()),
            FixtureOutcome::Mismatch { location, expected, actual } => {
                failures += 1;
                warn!("Fixture mismatch in {} at {}", path.display(), location);
                println!("MISMATCH {} at {location}", path.display());
                println!("  expected: {expected}");
                println!("  actual:   {actual}");
            }
        }
    }

    println!("{} fixtures, {} mismatched", paths.len(), failures);
    if failures > 0 {
        anyhow::bail!("{failures} of {} fixtures mismatched", paths.len());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // WHY: logs go to stderr so token output on stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!(?args, "Parsed CLI arguments");

    let tokenizer = TokenizeUk::with_config(load_config(&args)?)?;

    match args.command {
        Command::Tokenize {
            files,
            format,
            fail_fast,
            no_progress,
            stats_out,
        } => {
            if files.is_empty() {
                return tokenize_stdin(&tokenizer, format).await;
            }
            let config = BatchConfig {
                format,
                fail_fast,
                show_progress: !no_progress,
                ..Default::default()
            };
            tokenize_files(tokenizer, files, config, stats_out.as_deref()).await
        }
        Command::Check { dir } => check_fixtures(&tokenizer, &dir),
    }
}
