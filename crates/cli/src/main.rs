use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use folia_core::{Book, TextConfig, extract_chapter_text_with_config, read_book};
use owo_colors::OwoColorize;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for extracted content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: text, json", s)),
        }
    }
}

/// Extract metadata and chapter text from EPUB files
#[derive(Parser, Debug)]
#[command(name = "folia")]
#[command(version = VERSION)]
#[command(about = "Extract metadata and chapter text from EPUB files", long_about = None)]
struct Args {
    /// Path to an EPUB file (no argument: exit silently)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Print the extracted text of the chapter at this spine position
    /// instead of the book title
    #[arg(short, long, value_name = "NUM")]
    chapter: Option<usize>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write the cover image to this file
    #[arg(long, value_name = "FILE")]
    cover: Option<PathBuf>,

    /// Do not separate block elements with blank lines
    #[arg(long)]
    no_paragraph_breaks: bool,

    /// Enable debug logging and progress output
    #[arg(short, long)]
    verbose: bool,
}

/// Print a styled banner for verbose mode
fn print_banner() {
    eprintln!("\n{} {} {}", "Folia".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Extract metadata and chapter text from EPUB files".dimmed());
    eprintln!();
}

/// Print a styled step message
fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print a warning message
fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn chapter_text(book: &Book, sequence: usize, config: &TextConfig) -> anyhow::Result<String> {
    let chapter = book.chapter(sequence).with_context(|| {
        format!("Chapter {} out of range (book has {} chapters)", sequence, book.chapters.len())
    })?;
    extract_chapter_text_with_config(chapter, config)
        .with_context(|| format!("Failed to extract text from chapter {}", sequence))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    // No input is a silent no-op, not a usage error.
    let Some(input) = args.input else {
        return Ok(());
    };

    if args.verbose {
        print_banner();
        print_step(1, 3, &format!("Reading {}", input.display().bright_white()));
    }

    let book = read_book(&input).with_context(|| format!("Failed to read {}", input.display()))?;

    if args.verbose {
        print_step(2, 3, "Assembling book");
        eprintln!("  {} {}", "Title:".dimmed(), book.title().bright_white());
        if !book.metadata.authors.is_empty() {
            eprintln!("  {} {}", "Authors:".dimmed(), book.metadata.authors.join(", ").bright_white());
        }
        eprintln!("  {} {}", "Chapters:".dimmed(), book.chapters.len().to_string().bright_white());
        eprintln!();
    }

    if let Some(path) = &args.cover {
        match &book.cover {
            Some(cover) => {
                fs::write(path, &cover.data)
                    .with_context(|| format!("Failed to write cover to {}", path.display()))?;
                print_success(&format!("Cover ({}) written to {}", cover.media_type, path.display()));
            }
            None => print_warning("Book has no cover image"),
        }
    }

    let text_config = TextConfig { paragraph_breaks: !args.no_paragraph_breaks };

    let output = match (args.format, args.chapter) {
        (OutputFormat::Text, Some(sequence)) => chapter_text(&book, sequence, &text_config)?,
        (OutputFormat::Text, None) => book.title().to_string(),
        (OutputFormat::Json, Some(sequence)) => {
            let chapter = book.chapter(sequence).with_context(|| {
                format!("Chapter {} out of range (book has {} chapters)", sequence, book.chapters.len())
            })?;
            serde_json::to_string_pretty(&serde_json::json!({
                "sequence": chapter.sequence,
                "title": chapter.display_title(),
                "href": chapter.href,
                "text": chapter_text(&book, sequence, &text_config)?,
            }))?
        }
        (OutputFormat::Json, None) => serde_json::to_string_pretty(&serde_json::json!({
            "title": book.title(),
            "metadata": book.metadata,
            "chapters": book.chapters,
            "has_cover": book.cover.is_some(),
        }))?,
    };

    if args.verbose {
        print_step(3, 3, "Writing output");
        eprintln!("  {} {}", "Format:".dimmed(), format!("{:?}", args.format).bright_white());
        eprintln!();
    }

    match args.output {
        Some(path) => {
            fs::write(&path, output)
                .with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            println!("{}", output);
        }
    }

    Ok(())
}
