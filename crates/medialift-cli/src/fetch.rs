//! Resumable, idempotent download of source objects
//!
//! Each record is fetched to `<download_dir>/<sanitized final name>`.
//! A record whose destination file already exists is skipped without any
//! network traffic, which makes re-running a partially completed batch safe
//! and cheap. Bytes stream to a `.part` sibling and only appear under the
//! final name after the body is complete, so an interrupted run never leaves
//! a truncated file that a later run would mistake for finished work.
//!
//! Failures are contained per record: the batch always runs to the end and
//! the caller receives one [`FetchResult`] per request.

use crate::api::SourceClient;
use crate::error::Result;
use crate::progress::{progress_fraction, ProgressObserver};
use futures::StreamExt;
use medialift_common::checksum::{compute_file_checksum, StreamingChecksum};
use medialift_common::{error_chain, RecordFailure, TransferStatus};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, trace, warn};

/// Characters rejected by common filesystems
pub const INVALID_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Suffix of the in-progress download file
pub const PART_SUFFIX: &str = ".part";

/// Replace characters that are invalid in file names with `_`
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if INVALID_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// One record's worth of fetch work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// 1-based data row in the input manifest
    pub row: usize,
    /// Display name, used only in messages
    pub original_name: String,
    pub source_locator: String,
    /// Disambiguated destination name (before sanitizing)
    pub final_name: String,
}

/// A record whose bytes are on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// `Fetched` or `SkippedExists`
    pub status: TransferStatus,
    pub local_path: PathBuf,
    pub bytes: u64,
    /// SHA-256 of the file at `local_path`
    pub checksum: String,
}

pub type FetchResult = std::result::Result<Fetched, RecordFailure>;

/// Outcome of one fetch run, in request order
#[derive(Debug, Default)]
pub struct FetchReport {
    pub results: Vec<(FetchRequest, FetchResult)>,
}

impl FetchReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Records downloaded during this run
    pub fn fetched(&self) -> usize {
        self.count_status(TransferStatus::Fetched)
    }

    /// Records already present on disk
    pub fn skipped(&self) -> usize {
        self.count_status(TransferStatus::SkippedExists)
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|(_, r)| r.is_err()).count()
    }

    fn count_status(&self, status: TransferStatus) -> usize {
        self.results
            .iter()
            .filter(|(_, r)| matches!(r, Ok(f) if f.status == status))
            .count()
    }
}

/// What a valid request needs done
#[derive(Debug, Clone, PartialEq, Eq)]
enum Plan {
    AlreadyPresent(PathBuf),
    Download { locator: String, local_path: PathBuf },
}

impl Plan {
    fn local_path(&self) -> &Path {
        match self {
            Plan::AlreadyPresent(local_path) | Plan::Download { local_path, .. } => local_path,
        }
    }
}

/// Streams source objects into a download directory
pub struct TransferFetcher {
    source: SourceClient,
    download_dir: PathBuf,
    delay: Duration,
}

impl TransferFetcher {
    /// Create a fetcher writing under `download_dir`, with no delay between downloads
    pub fn new(source: SourceClient, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            download_dir: download_dir.into(),
            delay: Duration::ZERO,
        }
    }

    /// Pause for `delay` between consecutive downloads
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Where a record with this final name is stored
    pub fn local_path_for(&self, final_name: &str) -> PathBuf {
        self.download_dir.join(sanitize_filename(final_name))
    }

    /// Create the download directory. Failing here is fatal for the stage.
    pub async fn prepare(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.download_dir).await?;
        Ok(())
    }

    /// Fetch every request in order, never stopping on a failed record
    pub async fn fetch_all<F>(&self, requests: Vec<FetchRequest>, mut observer_for: F) -> FetchReport
    where
        F: FnMut(&FetchRequest) -> Box<dyn ProgressObserver>,
    {
        let mut report = FetchReport::default();
        let mut downloaded_before = false;
        // Sanitized path -> row that claimed it earlier in this run
        let mut claimed: HashMap<PathBuf, usize> = HashMap::new();

        for request in requests {
            let plan = self.plan(&request).await.and_then(|plan| {
                match claimed.entry(plan.local_path().to_path_buf()) {
                    Entry::Occupied(owner) => Err(RecordFailure::input(format!(
                        "Row {}: destination path collides with row {}",
                        request.row,
                        owner.get()
                    ))),
                    Entry::Vacant(slot) => {
                        slot.insert(request.row);
                        Ok(plan)
                    },
                }
            });

            let result = match plan {
                Ok(Plan::Download { locator, local_path }) => {
                    if downloaded_before && !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                    downloaded_before = true;

                    let observer = observer_for(&request);
                    let result = self.download(&locator, &local_path, observer.as_ref()).await;
                    observer.on_finish();
                    result
                },
                Ok(Plan::AlreadyPresent(local_path)) => self.existing(local_path).await,
                Err(failure) => Err(failure),
            };

            log_result(&request, &result);
            report.results.push((request, result));
        }

        report
    }

    /// Fetch a single request
    pub async fn fetch_one(&self, request: &FetchRequest, observer: &dyn ProgressObserver) -> FetchResult {
        match self.plan(request).await? {
            Plan::AlreadyPresent(local_path) => self.existing(local_path).await,
            Plan::Download { locator, local_path } => {
                let result = self.download(&locator, &local_path, observer).await;
                observer.on_finish();
                result
            },
        }
    }

    async fn plan(&self, request: &FetchRequest) -> std::result::Result<Plan, RecordFailure> {
        let locator = request.source_locator.trim();
        let final_name = request.final_name.trim();

        if locator.is_empty() || final_name.is_empty() {
            let missing = match (locator.is_empty(), final_name.is_empty()) {
                (true, true) => "source URL and destination name",
                (true, false) => "source URL",
                _ => "destination name",
            };
            return Err(RecordFailure::input(format!("Row {}: missing {}", request.row, missing)));
        }

        let local_path = self.local_path_for(final_name);
        if tokio::fs::try_exists(&local_path).await? {
            return Ok(Plan::AlreadyPresent(local_path));
        }

        Ok(Plan::Download {
            locator: locator.to_string(),
            local_path,
        })
    }

    async fn existing(&self, local_path: PathBuf) -> FetchResult {
        let bytes = tokio::fs::metadata(&local_path).await?.len();
        let path = local_path.clone();
        let checksum = tokio::task::spawn_blocking(move || compute_file_checksum(path))
            .await
            .map_err(|e| RecordFailure::local_io(e.to_string()))?
            .map_err(|e| RecordFailure::local_io(e.to_string()))?;

        Ok(Fetched {
            status: TransferStatus::SkippedExists,
            local_path,
            bytes,
            checksum,
        })
    }

    async fn download(&self, locator: &str, local_path: &Path, observer: &dyn ProgressObserver) -> FetchResult {
        let part_path = part_path_for(local_path);

        let streamed = self.stream_to(locator, &part_path, observer).await;
        let (bytes, checksum) = match streamed {
            Ok(done) => done,
            Err(failure) => {
                let _ = tokio::fs::remove_file(&part_path).await;
                return Err(failure);
            },
        };

        if let Err(e) = tokio::fs::rename(&part_path, local_path).await {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(e.into());
        }

        Ok(Fetched {
            status: TransferStatus::Fetched,
            local_path: local_path.to_path_buf(),
            bytes,
            checksum,
        })
    }

    async fn stream_to(
        &self,
        locator: &str,
        part_path: &Path,
        observer: &dyn ProgressObserver,
    ) -> std::result::Result<(u64, String), RecordFailure> {
        let response = self.source.open(locator).await?;
        let total = response.content_length();
        debug!(locator, total = ?total, "Source responded");

        let mut file = tokio::fs::File::create(part_path).await?;
        let mut checksum = StreamingChecksum::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                RecordFailure::transport(format!("Download interrupted: {}", error_chain(&e)))
            })?;
            file.write_all(&chunk).await?;
            checksum.update(&chunk);
            trace!(
                locator,
                bytes = checksum.bytes(),
                fraction = ?progress_fraction(checksum.bytes(), total),
                "Chunk written"
            );
            observer.on_progress(checksum.bytes(), total);
        }

        file.flush().await?;
        file.sync_all().await?;

        let bytes = checksum.bytes();
        check_complete(bytes, total)?;
        Ok((bytes, checksum.finalize()))
    }
}

/// `<local_path>.part`
pub fn part_path_for(local_path: &Path) -> PathBuf {
    let mut name = local_path.as_os_str().to_owned();
    name.push(PART_SUFFIX);
    PathBuf::from(name)
}

/// A body shorter or longer than its declared length is a failed transfer
fn check_complete(received: u64, declared: Option<u64>) -> std::result::Result<(), RecordFailure> {
    match declared {
        Some(expected) if expected != received => Err(RecordFailure::transport(format!(
            "Incomplete download: received {} of {} bytes",
            received, expected
        ))),
        _ => Ok(()),
    }
}

fn log_result(request: &FetchRequest, result: &FetchResult) {
    match result {
        Ok(fetched) if fetched.status == TransferStatus::SkippedExists => info!(
            row = request.row,
            path = %fetched.local_path.display(),
            "File already exists, skipping"
        ),
        Ok(fetched) => info!(
            row = request.row,
            name = %request.original_name,
            path = %fetched.local_path.display(),
            bytes = fetched.bytes,
            "Fetched file"
        ),
        Err(failure) => warn!(
            row = request.row,
            name = %request.original_name,
            error = %failure,
            "Fetch failed"
        ),
    }
}
