//! `medialift fetch` command implementation
//!
//! Downloads every row of the manifest into the download directory and
//! records each row's outcome.

use crate::api::SourceClient;
use crate::commands::rename::{NAME_COLUMN, RENAMED_COLUMN};
use crate::config::Config;
use crate::error::Result;
use crate::fetch::{FetchReport, FetchRequest, TransferFetcher};
use crate::manifest::Manifest;
use crate::progress::{format_bytes, DownloadBar, ProgressObserver};
use colored::Colorize;
use medialift_common::TransferStatus;
use std::path::Path;
use tracing::info;

pub const FILENAME_COLUMN: &str = "filename";
pub const SOURCE_COLUMN: &str = "s3_url";
pub const LOCAL_PATH_COLUMN: &str = "local_path";
pub const STATUS_COLUMN: &str = "transfer_status";
pub const CHECKSUM_COLUMN: &str = "checksum";
pub const ERROR_COLUMN: &str = "error_detail";

/// Fetch every row of `input` and write the results to `output`
pub async fn run(input: &Path, output: &Path, config: &Config) -> Result<()> {
    println!("{} Reading {}...", "→".cyan(), input.display());
    let mut manifest = Manifest::load(input)?;
    let requests = requests_from(&manifest)?;

    let source = SourceClient::new(config.timeout)?;
    let fetcher = TransferFetcher::new(source, &config.download_dir).with_delay(config.fetch_delay);
    fetcher.prepare().await?;

    println!(
        "{} Fetching {} file(s) into {}",
        "↓".cyan(),
        requests.len(),
        fetcher.download_dir().display()
    );

    let report = fetcher
        .fetch_all(requests, |request| {
            Box::new(DownloadBar::new(&request.final_name)) as Box<dyn ProgressObserver>
        })
        .await;

    record_results(&mut manifest, &report);
    manifest.save(output)?;

    info!(
        total = report.total(),
        fetched = report.fetched(),
        skipped = report.skipped(),
        failed = report.failed(),
        "Fetch complete"
    );

    print_summary(&report, fetcher.download_dir(), output);
    Ok(())
}

/// Build one request per manifest row.
///
/// The destination name comes from `renamed` when the manifest went through
/// the rename stage, otherwise from `new_name`.
pub fn requests_from(manifest: &Manifest) -> Result<Vec<FetchRequest>> {
    let source_col = manifest.require_column(SOURCE_COLUMN)?;
    let name_col = match manifest.column(RENAMED_COLUMN) {
        Some(col) => col,
        None => manifest.require_column(NAME_COLUMN)?,
    };
    let filename_col = manifest.column(FILENAME_COLUMN);

    let requests = (0..manifest.len())
        .map(|row| FetchRequest {
            row: row + 1,
            original_name: filename_col
                .map(|col| manifest.get(row, col).to_string())
                .unwrap_or_default(),
            source_locator: manifest.get(row, source_col).to_string(),
            final_name: manifest.get(row, name_col).to_string(),
        })
        .collect();

    Ok(requests)
}

/// Write each row's outcome into the result columns
pub fn record_results(manifest: &mut Manifest, report: &FetchReport) {
    let path_col = manifest.ensure_column(LOCAL_PATH_COLUMN);
    let status_col = manifest.ensure_column(STATUS_COLUMN);
    let checksum_col = manifest.ensure_column(CHECKSUM_COLUMN);
    let error_col = manifest.ensure_column(ERROR_COLUMN);

    for (request, result) in &report.results {
        let row = request.row - 1;
        match result {
            Ok(fetched) => {
                manifest.set(row, path_col, fetched.local_path.display().to_string());
                manifest.set(row, status_col, fetched.status.as_str());
                manifest.set(row, checksum_col, fetched.checksum.as_str());
                manifest.set(row, error_col, "");
            },
            Err(failure) => {
                manifest.set(row, path_col, "");
                manifest.set(row, status_col, TransferStatus::Failed.as_str());
                manifest.set(row, checksum_col, "");
                manifest.set(row, error_col, failure.detail.as_str());
            },
        }
    }
}

fn print_summary(report: &FetchReport, download_dir: &Path, output: &Path) {
    let downloaded_bytes: u64 = report
        .results
        .iter()
        .filter_map(|(_, r)| r.as_ref().ok())
        .filter(|f| f.status == TransferStatus::Fetched)
        .map(|f| f.bytes)
        .sum();

    println!();
    println!("{}", "Download Summary:".cyan().bold());
    println!("  Total files: {}", report.total());
    println!("  {} Downloaded: {} ({})", "✓".green(), report.fetched(), format_bytes(downloaded_bytes));
    println!("  {} Skipped: {} (already present)", "-".yellow(), report.skipped());
    println!("  {} Failed: {}", "✗".red(), report.failed());
    println!("  Download directory: {}", download_dir.display());

    for (request, result) in &report.results {
        if let Err(failure) = result {
            let label = if request.original_name.is_empty() {
                format!("row {}", request.row)
            } else {
                request.original_name.clone()
            };
            println!("    {} {}: {}", "✗".red(), label, failure.detail);
        }
    }

    println!();
    println!("{} Results written to {}", "✓".green(), output.display());
}
