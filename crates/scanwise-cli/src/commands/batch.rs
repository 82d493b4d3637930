//! Batch command - scan many receipt files in one run.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, warn};

use scanwise_core::{Category, ExtractedReceipt};

use super::{classify_input, load_config, scan};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file JSON results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of scanning a single file.
#[derive(Serialize)]
struct FileResult {
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    receipt: Option<ExtractedReceipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggested_category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| classify_input(p).is_some())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching receipt files for pattern: {}", args.input);
    }

    println!("{} Found {} files to scan", style("ℹ").blue(), files.len());

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = scan_one(&path, config.clone()).await;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok((receipt, suggested_category)) => {
                results.push(FileResult {
                    path: path.clone(),
                    receipt: Some(receipt),
                    suggested_category: Some(suggested_category),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let message = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to scan {}: {}", path.display(), message);
                    results.push(FileResult {
                        path: path.clone(),
                        receipt: None,
                        suggested_category: None,
                        error: Some(message),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to scan {}: {}", path.display(), message);
                    anyhow::bail!("Scan failed for {}: {}", path.display(), message);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if let Some(ref output_dir) = args.output_dir {
        for result in results.iter().filter(|r| r.receipt.is_some()) {
            let stem = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("receipt");
            let output_path = output_dir.join(format!("{}.json", stem));
            fs::write(&output_path, serde_json::to_string_pretty(result)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    let successful = results.iter().filter(|r| r.receipt.is_some()).count();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Scanned {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

async fn scan_one(
    path: &PathBuf,
    config: scanwise_core::ScanConfig,
) -> anyhow::Result<(ExtractedReceipt, Category)> {
    let kind = classify_input(path)
        .ok_or_else(|| scanwise_core::ScanError::UnsupportedFormat(path.display().to_string()))?;
    let data = fs::read(path)?;

    let outcome = scan::scan_with_timeout(data, kind, config).await?;
    Ok((outcome.receipt, outcome.suggested_category))
}
