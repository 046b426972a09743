//! PII Redaction CLI Application.
//!
//! This binary provides a command-line interface for the pii-redactor
//! library: detect PII in a PDF, burn masks into it, or do both at once.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use pii_redactor::{
    convert_to_redaction_masks, extract_text, LayoutSource, MaskColor, MupdfLayout, PiiDetector,
    RedactionCategory, RedactionMask, RedactionService,
};

/// PDF PII Redaction Tool
///
/// Detect personal information in PDF documents and burn opaque masks over it.
#[derive(Parser)]
#[command(name = "pii-redactor")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (debug logging unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect PII and print the detections
    Detect {
        /// Input PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Only scan this zero-based page
        #[arg(short, long, value_name = "INDEX")]
        page: Option<usize>,

        /// Only report these categories (phone-number, email, rrn, birth-date, address)
        #[arg(short, long, value_name = "CATEGORY")]
        category: Vec<RedactionCategory>,

        /// Print detections as JSON
        #[arg(long)]
        json: bool,

        /// Write the detections, converted to masks, to this JSON file
        #[arg(long, value_name = "FILE")]
        masks_out: Option<PathBuf>,
    },

    /// Dump the positioned text runs of a page as JSON (for debugging)
    Runs {
        /// Input PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Zero-based page index
        #[arg(short, long, value_name = "INDEX", default_value_t = 0)]
        page: usize,
    },

    /// Burn masks from a JSON file into a PDF
    Burn {
        /// Input PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// JSON array of redaction masks
        #[arg(short, long, value_name = "FILE")]
        masks: PathBuf,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Detect PII on every page and burn a mask over each detection
    Redact {
        /// Input PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Only redact these categories (default: all)
        #[arg(short, long, value_name = "CATEGORY")]
        category: Vec<RedactionCategory>,

        /// Mask colour as #RRGGBB or #AARRGGBB
        #[arg(long, value_name = "COLOR", default_value = "#000000")]
        color: MaskColor,

        /// Also write the generated masks to this JSON file
        #[arg(long, value_name = "FILE")]
        masks_out: Option<PathBuf>,
    },

    /// Extract plain text from a PDF (for debugging and verification)
    Extract {
        /// Input PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output text file (optional, defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Command handler holding the configured services.
struct RedactionHandler {
    service: RedactionService,
    verbose: bool,
}

impl RedactionHandler {
    fn new(verbose: bool) -> Self {
        Self {
            service: RedactionService::with_overlay_strategy(),
            verbose,
        }
    }

    fn detect(
        &self,
        input: &Path,
        page: Option<usize>,
        categories: &[RedactionCategory],
        json: bool,
        masks_out: Option<&Path>,
    ) -> Result<()> {
        ensure_exists(input)?;
        let detector = build_detector(categories);

        let detections = match page {
            Some(index) => detector.detect_pii(input, index),
            None => detector.detect_pii_in_all_pages(input),
        }
        .with_context(|| "PII detection failed")?;

        if json {
            println!("{}", serde_json::to_string_pretty(&detections)?);
        } else if detections.is_empty() {
            println!("⚠ No PII found");
        } else {
            for d in &detections {
                println!(
                    "page {:>3}  {:<12}  {:<30}  x={:.1} y={:.1} w={:.1} h={:.1}",
                    d.page_index, d.category, d.text, d.x, d.y, d.width, d.height
                );
            }
            println!("✓ Found {} PII instance(s)", detections.len());
        }

        if let Some(path) = masks_out {
            write_masks(path, &convert_to_redaction_masks(&detections))?;
        }

        Ok(())
    }

    fn runs(&self, input: &Path, page: usize) -> Result<()> {
        ensure_exists(input)?;
        let layout = MupdfLayout::open(input).with_context(|| "Failed to open PDF")?;
        let runs = layout
            .page_runs(page)
            .with_context(|| format!("Failed to extract runs from page {}", page))?;
        println!("{}", serde_json::to_string_pretty(&runs)?);
        Ok(())
    }

    fn burn(&self, input: &Path, masks_path: &Path, output: &Path) -> Result<()> {
        ensure_exists(input)?;
        let bytes = std::fs::read(masks_path)
            .with_context(|| format!("Failed to read {}", masks_path.display()))?;
        let masks: Vec<RedactionMask> = serde_json::from_slice(&bytes)
            .with_context(|| format!("Invalid mask file {}", masks_path.display()))?;

        if self.verbose {
            println!("Input:  {}", input.display());
            println!("Output: {}", output.display());
            println!("Masks:  {}", masks.len());
        }

        let report = self
            .service
            .burn_masks_to_file(input, &masks, output)
            .with_context(|| "Burn-in failed")?;

        self.print_report(&report, output);
        Ok(())
    }

    fn redact(
        &self,
        input: &Path,
        output: &Path,
        categories: &[RedactionCategory],
        color: MaskColor,
        masks_out: Option<&Path>,
    ) -> Result<()> {
        ensure_exists(input)?;
        let detector = build_detector(categories);

        if self.verbose {
            println!("Input:  {}", input.display());
            println!("Output: {}", output.display());
            println!("Color:  {}", color);
        }

        let (masks, report) = self
            .service
            .redact_detected(&detector, input, output, color)
            .with_context(|| "Redaction failed")?;

        if let Some(path) = masks_out {
            write_masks(path, &masks)?;
        }

        self.print_report(&report, output);
        Ok(())
    }

    fn extract(&self, input: &Path, output: Option<&Path>) -> Result<()> {
        ensure_exists(input)?;
        let text = extract_text(input).with_context(|| "Text extraction failed")?;

        if let Some(output_path) = output {
            std::fs::write(output_path, &text)
                .with_context(|| format!("Failed to write to {}", output_path.display()))?;
            println!(
                "✓ Extracted {} characters → {}",
                text.chars().count(),
                output_path.display()
            );
        } else {
            println!("{}", text);
        }

        Ok(())
    }

    fn print_report(&self, report: &pii_redactor::BurnReport, output: &Path) {
        if self.verbose {
            println!("\nBurn-in Summary:");
            println!("  Pages processed: {}", report.pages_processed);
            println!("  Pages modified:  {}", report.pages_modified);
            println!("  Masks drawn:     {}", report.masks_drawn);
            println!("  Masks skipped:   {}", report.masks_skipped);
        }

        if report.has_redactions() {
            println!(
                "✓ Successfully burned {} mask(s) → {}",
                report.masks_drawn,
                output.display()
            );
        } else {
            println!("⚠ No masks drawn; output written unchanged → {}", output.display());
        }
    }
}

fn ensure_exists(input: &Path) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }
    Ok(())
}

fn build_detector(categories: &[RedactionCategory]) -> PiiDetector {
    if categories.is_empty() {
        PiiDetector::new()
    } else {
        PiiDetector::new().with_categories(categories)
    }
}

fn write_masks(path: &Path, masks: &[RedactionMask]) -> Result<()> {
    let json = serde_json::to_string_pretty(masks)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("✓ Wrote {} mask(s) → {}", masks.len(), path.display());
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let handler = RedactionHandler::new(cli.verbose);

    match &cli.command {
        Commands::Detect {
            input,
            page,
            category,
            json,
            masks_out,
        } => handler.detect(input, *page, category, *json, masks_out.as_deref()),
        Commands::Runs { input, page } => handler.runs(input, *page),
        Commands::Burn {
            input,
            masks,
            output,
        } => handler.burn(input, masks, output),
        Commands::Redact {
            input,
            output,
            category,
            color,
            masks_out,
        } => handler.redact(input, output, category, *color, masks_out.as_deref()),
        Commands::Extract { input, output } => handler.extract(input, output.as_deref()),
    }
}
