//! CLI parsing and orchestration. Reads the identifier, fetches with fallback, writes the
//! mind map (or JSON). Every outcome is reported on stdout; the exit status is always success.

use crate::config::{self, Config};
use crate::model::BookRecord;
use crate::outline::{write_mindmap, OutlineError};
use crate::source::{
    fetch_book, FetchError, FetchOptions, HttpTransport, Origin, SourceSelection, Transport,
};
use clap::Parser;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

const PROMPT: &str = "Enter ISBN (no hyphens): ";

/// CLI error. The Display text is what gets printed.
#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("Error: {0}")]
    InvalidInput(String),

    #[error("Error: {0}")]
    Config(String),

    #[error("Error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Error writing mindmap: {0}")]
    Write(#[from] OutlineError),

    #[error("Error: console I/O failed: {0}")]
    Console(#[from] std::io::Error),
}

/// Output format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Mindmap,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "tocmap")]
#[command(about = "Fetch a book's table of contents by ISBN and write it as a FreeMind mind map")]
#[command(
    after_help = "Config file keys (output_dir, user_agent, timeout_secs, catalog_url, search_url) are read from ./tocmap.toml or the user config dir. CLI flags override config."
)]
pub struct Args {
    /// ISBN without hyphens. Prompted for on stdin when omitted.
    pub identifier: Option<String>,

    /// Output path. Default: ./{identifier}.mm (or .json with --format json).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format: mm or json.
    #[arg(long, default_value = "mm", value_parser = parse_format)]
    pub format: OutputFormat,

    /// Sources to query: auto (Open Library, then Google Books), primary, or secondary.
    #[arg(long, default_value = "auto", value_parser = parse_source)]
    pub source: SourceSelection,

    /// HTTP User-Agent (overrides config).
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Request timeout in seconds (overrides config; default: HTTP client default).
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Suppress source status lines (results and errors are still printed).
    #[arg(short, long)]
    pub quiet: bool,

    /// Print verbose error chain and debug logs.
    #[arg(long)]
    pub verbose: bool,
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    match s.to_lowercase().as_str() {
        "mm" | "mindmap" | "freemind" => Ok(OutputFormat::Mindmap),
        "json" => Ok(OutputFormat::Json),
        _ => Err(format!("Invalid --format value: '{}'. Use mm or json.", s)),
    }
}

fn parse_source(s: &str) -> Result<SourceSelection, String> {
    match s.to_lowercase().as_str() {
        "auto" => Ok(SourceSelection::Auto),
        "primary" | "openlibrary" => Ok(SourceSelection::PrimaryOnly),
        "secondary" | "google" | "googlebooks" => Ok(SourceSelection::SecondaryOnly),
        _ => Err(format!(
            "Invalid --source value: '{}'. Use auto, primary, or secondary.",
            s
        )),
    }
}

fn extension_for_format(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Mindmap => "mm",
        OutputFormat::Json => "json",
    }
}

/// Set up env_logger for this crate. `RUST_LOG` still applies on top.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    let _ = env_logger::builder()
        .filter_module("tocmap", level)
        .parse_default_env()
        .try_init();
}

/// Read one line as the identifier. Only the line terminator is removed.
fn read_identifier<R: BufRead>(input: &mut R) -> Result<String, CliRunError> {
    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|e| CliRunError::InvalidInput(format!("Cannot read identifier: {}", e)))?;
    let line = line.strip_suffix('\n').unwrap_or(&line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    Ok(line.to_string())
}

/// Explicit --output wins; otherwise `<identifier>.<ext>`, inside output_dir when configured.
fn output_path(args: &Args, config: &Config, identifier: &str) -> PathBuf {
    if let Some(p) = &args.output {
        return p.clone();
    }
    let file_name = format!("{}.{}", identifier, extension_for_format(args.format));
    match &config.output_dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

fn write_json(book: &BookRecord, path: &Path) -> Result<(), OutlineError> {
    let io_err = |source| OutlineError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut w = BufWriter::new(File::create(path).map_err(io_err)?);
    serde_json::to_writer_pretty(&mut w, book)
        .map_err(|e| io_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    writeln!(w).map_err(io_err)?;
    w.flush().map_err(io_err)
}

/// Entry point for the CLI.
pub fn run(args: &Args) -> Result<(), CliRunError> {
    let config = config::load_config()
        .map_err(CliRunError::Config)?
        .unwrap_or_default();

    let mut builder = HttpTransport::builder();
    if let Some(ua) = args.user_agent.clone().or_else(|| config.user_agent.clone()) {
        builder = builder.user_agent(ua);
    }
    if let Some(secs) = args.timeout.or(config.timeout_secs) {
        builder = builder.timeout_secs(secs);
    }
    let mut transport = builder
        .build()
        .map_err(|e| CliRunError::InvalidInput(format!("Failed to create HTTP client: {}", e)))?;

    let identifier = match &args.identifier {
        Some(id) => id.clone(),
        None => {
            print!("{}", PROMPT);
            std::io::stdout().flush()?;
            read_identifier(&mut std::io::stdin().lock())?
        }
    };

    run_with(args, &config, &mut transport, &identifier).map(|_| ())
}

/// Fetch and write for one identifier. Returns the written path, or None when the
/// book has no table of contents.
pub fn run_with(
    args: &Args,
    config: &Config,
    transport: &mut dyn Transport,
    identifier: &str,
) -> Result<Option<PathBuf>, CliRunError> {
    let quiet = args.quiet;
    let on_fallback = |e: &FetchError| {
        log::debug!("primary failure: {}", e);
        if !quiet {
            println!("⚠️  Open Library failed or had no ToC. Trying Google Books...");
        }
    };
    let options = FetchOptions {
        on_fallback: Some(&on_fallback),
        selection: args.source,
    };

    let fetched = fetch_book(transport, &config.endpoints(), identifier, &options)?;
    if !args.quiet {
        match (fetched.origin, args.source) {
            (Origin::Secondary, SourceSelection::Auto) => {
                println!("✓ Fallback to {} successful", fetched.source_name)
            }
            _ => println!("✓ Got ToC from {}", fetched.source_name),
        }
    }

    if !fetched.book.has_chapters() {
        println!("No Table of Contents found.");
        return Ok(None);
    }

    let path = output_path(args, config, identifier);
    match args.format {
        OutputFormat::Mindmap => write_mindmap(&fetched.book, &path)?,
        OutputFormat::Json => write_json(&fetched.book, &path)?,
    }
    println!("{}", saved_message(args.format, &path));
    Ok(Some(path))
}

fn saved_message(format: OutputFormat, path: &Path) -> String {
    let what = match format {
        OutputFormat::Mindmap => "Mindmap",
        OutputFormat::Json => "JSON",
    };
    format!("✅ {} saved to {}", what, path.display())
}
