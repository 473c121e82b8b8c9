//! The `js2php` binary.
//!
//! Reads an ESTree JSON document produced externally (espree/acorn with
//! `loc`, `range`, `tokens` and comment attachment enabled) and writes the
//! translated PHP. Parsing JavaScript is deliberately not this program's
//! job.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use js2php_emitter::Options;

#[derive(Parser, Debug)]
#[command(name = "js2php", version, about = "Translate an ESTree JSON document to PHP")]
struct Args {
    /// ESTree JSON document to translate; `-` reads stdin.
    #[arg(default_value = "-")]
    input: String,

    /// Raw JavaScript source the document was parsed from. Defaults to the
    /// document's own `source` member when present.
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Write the PHP here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Translation options as a JSON file; flags below override it.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Namespace declaration to prepend to the output.
    #[arg(long)]
    namespace: Option<String>,

    /// Watermark comment emitted under the `<?php` opener.
    #[arg(long)]
    watermark: Option<String>,

    /// Emit `array( … )` literals instead of `[ … ]`.
    #[arg(long)]
    no_concise_arrays: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing when `JS2PHP_LOG` or `RUST_LOG` is set; zero cost
/// otherwise.
fn init_tracing() {
    let filter = std::env::var("JS2PHP_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok();
    if let Some(filter) = filter {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
            .with_writer(std::io::stderr)
            .init();
    }
}

fn run(args: &Args) -> Result<()> {
    let document = read_document(&args.input)?;
    let source = read_source(args, &document)?;
    let options = build_options(args)?;

    let php = js2php_emitter::translate_json(&document, &source, &options)
        .context("translation failed")?;

    match &args.output {
        Some(path) => fs::write(path, php)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{php}"),
    }
    Ok(())
}

fn read_document(input: &str) -> Result<serde_json::Value> {
    let text = if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        text
    } else {
        fs::read_to_string(input).with_context(|| format!("failed to read {input}"))?
    };
    serde_json::from_str(&text).context("input is not valid JSON")
}

fn read_source(args: &Args, document: &serde_json::Value) -> Result<String> {
    if let Some(path) = &args.source {
        return fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    Ok(document
        .get("source")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_string())
}

fn build_options(args: &Args) -> Result<Options> {
    let mut options = match &args.options {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("{} is not a valid options file", path.display()))?
        }
        None => Options::default(),
    };
    if args.namespace.is_some() {
        options.namespace = args.namespace.clone();
    }
    if args.watermark.is_some() {
        options.watermark = args.watermark.clone();
    }
    if args.no_concise_arrays {
        options.concise_arrays = false;
    }
    Ok(options)
}
