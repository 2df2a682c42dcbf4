//! CLI tool for generating themed slide decks from a topic.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deck_core::{download_link, Layout, Theme, Topic, Variant, DEFAULT_OUTPUT_DIR};
use deck_llm::{ContentGenerator, LlmConfig};
use deck_pptx::{PptxReader, PptxWriter};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Generate a PowerPoint presentation on any topic with an LLM.
#[derive(Parser, Debug)]
#[command(name = "deck-gen")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a deck for a topic
    Generate(GenerateArgs),

    /// Print the slides of an existing .pptx file
    Inspect(InspectArgs),
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Topic of the presentation
    topic: String,

    /// Theme: light, dark, blue, or default
    #[arg(short, long, default_value = "default", value_parser = parse_theme)]
    theme: Theme,

    /// Text-generation backend: gemini or openai
    #[arg(short, long, default_value = "gemini", value_parser = parse_variant)]
    backend: Variant,

    /// Model name (overrides GEMINI_MODEL / OPENAI_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Output directory
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Maximum characters per slide body (default depends on the backend)
    #[arg(long)]
    max_chars: Option<usize>,

    /// Write an HTML download link for the deck to this file ("-" for stdout)
    #[arg(long)]
    link: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct InspectArgs {
    /// Input .pptx file
    input: PathBuf,

    /// Print the slides as JSON
    #[arg(long)]
    json: bool,
}

fn parse_theme(s: &str) -> Result<Theme, String> {
    s.parse().map_err(|e: deck_core::Error| e.to_string())
}

fn parse_variant(s: &str) -> Result<Variant, String> {
    s.parse().map_err(|e: deck_core::Error| e.to_string())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match &args.command {
        Command::Generate(generate) => run_generate(generate, args.verbose),
        Command::Inspect(inspect) => run_inspect(inspect),
    }
}

/// Generate the deck, save it, and optionally write the download link.
fn run_generate(args: &GenerateArgs, verbose: bool) -> Result<()> {
    let topic = Topic::new(args.topic.as_str())?;

    let mut config = LlmConfig::from_env(args.backend)?;
    if let Some(model) = &args.model {
        config = config.with_model(model);
    }
    let client = config.build_client()?;

    let max_chars = args
        .max_chars
        .unwrap_or_else(|| args.backend.max_content_chars());
    let generator = ContentGenerator::new(client, max_chars);

    eprintln!("Generating presentation... Please wait.");
    let deck = generator
        .generate(topic)
        .context("Failed to generate slide content")?;

    if verbose {
        eprintln!("  Generated {} content slides", deck.slides.len());
    }

    let layout = Layout::for_variant(args.backend).with_max_body_chars(max_chars);
    let writer = PptxWriter::new(layout);
    let path = writer
        .save(&deck, args.theme, &args.output_dir)
        .with_context(|| format!("Failed to save deck to {}", args.output_dir.display()))?;

    eprintln!("Presentation generated successfully!");
    println!("{}", path.display());

    if let Some(link_path) = &args.link {
        write_link(&path, link_path)?;
    }

    Ok(())
}

/// Write the HTML download link for `deck_path` to `link_path`.
fn write_link(deck_path: &Path, link_path: &Path) -> Result<()> {
    let link = download_link(deck_path)
        .with_context(|| format!("Failed to read {}", deck_path.display()))?;

    if link_path == Path::new("-") {
        println!("{}", link);
    } else {
        std::fs::write(link_path, link)
            .with_context(|| format!("Failed to write {}", link_path.display()))?;
        log::info!("Download link written to {}", link_path.display());
    }

    Ok(())
}

/// Print the slides of an existing deck.
fn run_inspect(args: &InspectArgs) -> Result<()> {
    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    let summary = PptxReader::new()
        .read(BufReader::new(file))
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    for slide in &summary.slides {
        println!(
            "Slide {}: {}",
            slide.number,
            slide.title.as_deref().unwrap_or("(untitled)")
        );
        for line in &slide.body {
            println!("  {}", line);
        }
    }

    Ok(())
}
