//! Scan command - extract expense fields from a single receipt file.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use scanwise_core::{
    Category, ExtractedReceipt, OcrError, ReceiptScanner, ScanConfig, ScanError, ScanOutcome,
    TesseractEngine,
};

use super::{classify_input, load_config, InputKind};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Input file (image or PDF)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Include the raw recognized text in the output
    #[arg(long)]
    raw: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

/// Serializable scan result.
#[derive(Serialize)]
struct ScanReport {
    receipt: ExtractedReceipt,
    suggested_category: Category,
    processing_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_text: Option<String>,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let kind = classify_input(&args.input)
        .ok_or_else(|| ScanError::UnsupportedFormat(args.input.display().to_string()))?;

    info!("Scanning file: {}", args.input.display());
    let data = fs::read(&args.input)?;

    let outcome = scan_with_timeout(data, kind, config).await?;

    let report = ScanReport {
        raw_text: args.raw.then(|| outcome.raw_text.clone()),
        receipt: outcome.receipt,
        suggested_category: outcome.suggested_category,
        processing_time_ms: outcome.processing_time_ms,
    };

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Text => format_text(&report),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &rendered)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

/// Run the blocking scan off the async runtime, bounded by the configured
/// OCR time budget.
pub async fn scan_with_timeout(
    data: Vec<u8>,
    kind: InputKind,
    config: ScanConfig,
) -> anyhow::Result<ScanOutcome> {
    let timeout_secs = config.ocr.timeout_secs;
    debug!("Scan time budget: {}s", timeout_secs);

    let task = tokio::task::spawn_blocking(move || {
        let engine = TesseractEngine::new(&config.ocr);
        let scanner = ReceiptScanner::with_config(engine, config);
        match kind {
            InputKind::Image => scanner.scan_bytes(&data),
            InputKind::Pdf => scanner.scan_pdf(&data),
        }
    });

    match tokio::time::timeout(Duration::from_secs(timeout_secs), task).await {
        Ok(joined) => Ok(joined??),
        Err(_) => Err(OcrError::Timeout(timeout_secs).into()),
    }
}

fn format_text(report: &ScanReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("Vendor: {}\n", report.receipt.vendor));

    match &report.receipt.amount {
        Some(amount) => output.push_str(&format!("Amount: {}\n", amount)),
        None => output.push_str("Amount: (not detected, enter manually)\n"),
    }

    match &report.receipt.date {
        Some(date) => output.push_str(&format!("Date:   {}\n", date)),
        None => output.push_str("Date:   (not detected, enter manually)\n"),
    }

    output.push_str(&format!(
        "\nSuggested category: {} (confirm before saving)\n",
        report.suggested_category
    ));
    output.push_str(&format!("Processed in {}ms\n", report.processing_time_ms));

    if let Some(raw) = &report.raw_text {
        output.push_str("\nRecognized text:\n");
        output.push_str(raw);
        output.push('\n');
    }

    output
}
