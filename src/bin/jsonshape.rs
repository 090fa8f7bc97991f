//! jsonshape: infer a unified schema-shape from JSON documents
//!
//! Each input (stdin and/or files) is parsed into a per-document field
//! tree and folded into one merged view; the output lists every unified
//! path with the union of kinds observed there.
//!
//! Usage:
//!   # Single document from stdin
//!   echo '{"id": 1, "tags": ["a"]}' | jsonshape
//!
//!   # Merge several files, labels are the file paths
//!   jsonshape --file "a.json b.json" --out shape.txt
//!
//!   # Only look under $.data, skip $.data.blob, stop at depth 6
//!   jsonshape --file a.json --parse-objects '$.data' \
//!       --ignore-objects '$.data.blob' --max-depth 6

// Use MiMalloc allocator for better performance
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use jsonshape::{merge_document, parse_path, print_merger_tree, Merger, ParseOptions};
use std::fs::File;
use std::io::{stdin, stdout, BufReader, BufWriter, IsTerminal, Write};
use tracing::debug;
use tracing_subscriber::fmt;

#[derive(Parser, Debug)]
#[command(name = "jsonshape")]
#[command(about = "Infer a unified schema-shape from JSON documents", long_about = None)]
struct Args {
    /// JSON files to analyze (whitespace-separated)
    #[arg(long, value_name = "FILES", num_args = 1.., value_delimiter = ' ')]
    file: Vec<String>,

    /// Output file (default stdout)
    #[arg(long)]
    out: Option<String>,

    /// Diagnostic verbosity on stderr
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Canonical paths to parse, e.g. '$.users $.data.items' (whitespace-separated)
    #[arg(long, value_name = "PATHS", num_args = 1.., value_delimiter = ' ')]
    parse_objects: Vec<String>,

    /// Canonical paths to ignore, e.g. '$.metadata' (whitespace-separated)
    #[arg(long, value_name = "PATHS", num_args = 1.., value_delimiter = ' ')]
    ignore_objects: Vec<String>,

    /// Maximum depth to parse (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    max_depth: usize,

    /// Disable string sub-kind detection (uuid, email, ipv4, ...)
    #[arg(long)]
    no_string_analysis: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

fn parse_path_list(exprs: &[String]) -> Result<Vec<Vec<String>>> {
    exprs
        .iter()
        .filter(|e| !e.is_empty())
        .map(|e| parse_path(e).with_context(|| format!("bad path expression {e:?}")))
        .collect()
}

fn main() -> Result<()> {
    let args = Args::parse();

    fmt()
        .with_max_level(tracing::Level::from(args.log_level))
        .with_writer(std::io::stderr)
        .init();

    let options = ParseOptions {
        include: parse_path_list(&args.parse_objects)?,
        exclude: parse_path_list(&args.ignore_objects)?,
        max_depth: args.max_depth,
        analyze_strings: !args.no_string_analysis,
    };
    debug!(?options, "configuration");

    let has_stdin = !stdin().is_terminal();
    if !has_stdin && args.file.is_empty() {
        bail!("no input: pass --file or pipe a document on stdin");
    }

    let mut merger = Merger::new(Vec::new());

    if has_stdin {
        debug!("reading from stdin");
        merge_document(stdin().lock(), "stdin", &options, &mut merger)
            .context("parse stdin")?;
    }

    for path in &args.file {
        debug!(file = %path, "reading file");
        let file = File::open(path).with_context(|| format!("open {path}"))?;
        merge_document(BufReader::new(file), path, &options, &mut merger)
            .with_context(|| format!("parse {path}"))?;
    }

    debug!("merged shape:\n{}", merger.render_tree());

    match &args.out {
        Some(out_path) => {
            let file =
                File::create(out_path).with_context(|| format!("open output {out_path}"))?;
            let mut out = BufWriter::new(file);
            print_merger_tree(&merger, "", &mut out)?;
            out.flush()?;
        }
        None => {
            let mut out = stdout().lock();
            print_merger_tree(&merger, "", &mut out)?;
        }
    }

    Ok(())
}
