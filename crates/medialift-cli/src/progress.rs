//! Progress reporting for transfers
//!
//! Fetching reports progress through [`ProgressObserver`] rather than writing
//! to the terminal itself. The CLI plugs in an `indicatif` bar; tests plug in
//! a recorder and assert on the sequence of calls.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Receives byte counts while a body streams to disk
pub trait ProgressObserver: Send + Sync {
    /// Called after each chunk is written. `bytes_total` is the declared
    /// length of the body, when the source sent one.
    fn on_progress(&self, bytes_done: u64, bytes_total: Option<u64>);

    /// Called once when the transfer of a record ends, successfully or not
    fn on_finish(&self) {}
}

/// Observer that ignores every update
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _bytes_done: u64, _bytes_total: Option<u64>) {}
}

/// Fraction of the body written so far, when the total is known and non-zero
pub fn progress_fraction(bytes_done: u64, bytes_total: Option<u64>) -> Option<f64> {
    match bytes_total {
        Some(total) if total > 0 => Some((bytes_done as f64 / total as f64).min(1.0)),
        _ => None,
    }
}

/// Terminal progress bar for a single file download
pub struct DownloadBar {
    bar: ProgressBar,
}

impl DownloadBar {
    /// Create a bar labelled with `message`; hidden when stderr is not a terminal
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        bar.set_style(download_style());
        bar.set_message(message.to_string());
        Self { bar }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn length(&self) -> Option<u64> {
        self.bar.length()
    }
}

impl ProgressObserver for DownloadBar {
    fn on_progress(&self, bytes_done: u64, bytes_total: Option<u64>) {
        if let Some(total) = bytes_total {
            if self.bar.length() != Some(total) {
                self.bar.set_length(total);
            }
        }
        self.bar.set_position(bytes_done);
    }

    fn on_finish(&self) {
        self.bar.finish_and_clear();
    }
}

fn download_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

/// Format bytes into human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}
