// idcard-pdf: Generate print-ready employee ID cards as rasterized PDFs

use clap::Parser;
use idcard_pdf::assets::load_image_asset;
use idcard_pdf::error::AppError;
use idcard_pdf::export::{ExportOptions, Exporter, Outcome};
use idcard_pdf::notify::LogNotifier;
use idcard_pdf::scale::ResponsiveScaler;
use idcard_pdf::store::{self, SessionStore};
use std::path::PathBuf;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate print-ready employee ID cards as PDFs")]
struct Args {
    /// Employee record file (JSON, camelCase keys as produced by the form)
    #[arg(short, long)]
    input: PathBuf,

    /// Output filename (defaults to {firstName}_ID_Card.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Photo image (file path or URL) overriding the record's photo
    #[arg(long)]
    photo: Option<String>,

    /// Signature image (file path or URL) overriding the record's signature
    #[arg(long)]
    signature: Option<String>,

    /// Organisation logo (file path or URL) for the header and watermark
    #[arg(long)]
    logo: Option<String>,

    /// TrueType font file for card text (system fonts are searched otherwise)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Report the on-screen preview scale for this viewport width in pixels
    #[arg(long)]
    viewport: Option<f32>,

    /// Generate even when required fields are missing
    #[arg(long)]
    allow_incomplete: bool,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let args = Args::parse();

    // Read the submitted record; a missing file means no form was filled.
    let raw = std::fs::read_to_string(&args.input).map_err(|_| AppError::DataUnavailable)?;
    let mut record = store::parse_record(&raw)?;

    // Attach or override assets from the command line.
    if let Some(ref source) = args.photo {
        record.photo = Some(load_image_asset(source)?);
    }
    if let Some(ref source) = args.signature {
        record.signature = Some(load_image_asset(source)?);
    }
    let logo = match args.logo {
        Some(ref source) => Some(load_image_asset(source)?),
        None => None,
    };

    // Completeness gate: the form refuses to hand over a partial record.
    if !record.is_complete() && !args.allow_incomplete {
        eprintln!(
            "Record is {}% complete; missing fields: {}",
            record.completion_percent(),
            record.missing_fields().join(", ")
        );
        eprintln!("Pass --allow-incomplete to generate anyway.");
        return Err(AppError::DataCorrupt("required fields missing".into()));
    }

    // Hand the record through the session store: the form writes it once,
    // the preview consumes it once.
    let mut session = SessionStore::new();
    session.save_record(&record)?;
    let record = session.take_record()?;

    // Optional preview geometry report.
    if let Some(viewport) = args.viewport {
        let scaler = ResponsiveScaler::new(viewport);
        println!(
            "Preview: scale {:.4}, display height {:.1} px at viewport {} px",
            scaler.scale(),
            scaler.display_height(2),
            viewport
        );
    }

    let exporter = Exporter::new();
    let opts = ExportOptions {
        font: args.font,
        logo,
        output: args.output,
        ..Default::default()
    };

    match exporter.export(&record, &opts, &LogNotifier)? {
        Outcome::Completed(receipt) => {
            println!("✓ Generated: {}", receipt.path.display());
            println!("  Name: {}", record.full_name());
            println!("  Pages: {}", receipt.pages);
            println!("  Completion: {}%", record.completion_percent());
            Ok(())
        }
        Outcome::AlreadyInProgress => Ok(()),
    }
}
