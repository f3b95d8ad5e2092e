//! Publishing fetched files to the destination store
//!
//! One create call per record, in manifest order. Every record ends with a
//! [`PublishOutcome`]; a failed upload is recorded with the destination's raw
//! response text (or the local error message) and the batch moves on.

use crate::api::{ContentClient, ContentVersionRequest, Created, SourceClient};
use medialift_common::{PublishStatus, RecordFailure, TransferStatus};
use std::path::PathBuf;
use tracing::{info, warn};

/// Message recorded for successful uploads
pub const SUCCESS_MESSAGE: &str = "Uploaded successfully";

/// One record's worth of publish work
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PublishRequest {
    /// 1-based data row in the input manifest
    pub row: usize,
    pub title: String,
    pub path_on_client: String,
    /// Remote copy of the bytes, used when there is no local file
    pub source_locator: String,
    /// File written by the fetch stage, preferred over `source_locator`
    pub local_path: Option<PathBuf>,
    /// Fetch-stage status, when the manifest came from the fetch stage
    pub transfer_status: Option<TransferStatus>,
}

impl PublishRequest {
    /// Client-visible file name: `PathOnClient`, else the title
    pub fn client_path(&self) -> &str {
        let path = self.path_on_client.trim();
        if path.is_empty() {
            self.title.trim()
        } else {
            path
        }
    }

    /// Why this record must not be published, if anything
    pub fn ineligible_reason(&self) -> Option<String> {
        match self.transfer_status {
            Some(status) if !status.has_local_bytes() => {
                Some(format!("Not published: transfer status is {}", status))
            },
            _ => None,
        }
    }
}

/// Final state of one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The record was not eligible; no network call was made
    Skipped(String),
    /// The record was attempted
    Attempted(Result<Created, RecordFailure>),
}

impl PublishOutcome {
    pub fn status(&self) -> PublishStatus {
        match self {
            PublishOutcome::Skipped(_) => PublishStatus::Pending,
            PublishOutcome::Attempted(Ok(_)) => PublishStatus::Success,
            PublishOutcome::Attempted(Err(_)) => PublishStatus::Failed,
        }
    }

    /// Text for the `Message` column
    pub fn message(&self) -> &str {
        match self {
            PublishOutcome::Skipped(reason) => reason.as_str(),
            PublishOutcome::Attempted(Ok(_)) => SUCCESS_MESSAGE,
            PublishOutcome::Attempted(Err(failure)) => failure.detail.as_str(),
        }
    }

    /// Destination identifier; present exactly when the status is `Success`
    pub fn publish_id(&self) -> Option<&str> {
        match self {
            PublishOutcome::Attempted(Ok(created)) => Some(created.id.as_str()),
            _ => None,
        }
    }
}

/// Outcome of one publish run, in request order
#[derive(Debug, Default)]
pub struct PublishReport {
    pub results: Vec<(PublishRequest, PublishOutcome)>,
}

impl PublishReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.count(PublishStatus::Success)
    }

    pub fn failed(&self) -> usize {
        self.count(PublishStatus::Failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(PublishStatus::Pending)
    }

    fn count(&self, status: PublishStatus) -> usize {
        self.results.iter().filter(|(_, o)| o.status() == status).count()
    }
}

/// Uploads records to the destination, one create call each
pub struct TransferPublisher {
    content: ContentClient,
    source: SourceClient,
}

impl TransferPublisher {
    pub fn new(content: ContentClient, source: SourceClient) -> Self {
        Self { content, source }
    }

    /// Publish every request in order, never stopping on a failed record
    pub async fn publish_all(&self, requests: Vec<PublishRequest>) -> PublishReport {
        let mut report = PublishReport::default();

        for request in requests {
            let outcome = match request.ineligible_reason() {
                Some(reason) => {
                    info!(row = request.row, reason = %reason, "Skipping record");
                    PublishOutcome::Skipped(reason)
                },
                None => PublishOutcome::Attempted(self.publish_one(&request).await),
            };

            match &outcome {
                PublishOutcome::Attempted(Ok(created)) => {
                    info!(row = request.row, title = %request.title, id = %created.id, "Uploaded")
                },
                PublishOutcome::Attempted(Err(failure)) => {
                    warn!(row = request.row, title = %request.title, error = %failure, "Upload failed")
                },
                PublishOutcome::Skipped(_) => {},
            }

            report.results.push((request, outcome));
        }

        report
    }

    /// Read, encode and upload a single record
    pub async fn publish_one(&self, request: &PublishRequest) -> Result<Created, RecordFailure> {
        let client_path = request.client_path();
        if client_path.is_empty() {
            return Err(RecordFailure::input(format!(
                "Row {}: missing Title and PathOnClient",
                request.row
            )));
        }

        let bytes = self.payload(request).await?;

        let title = match request.title.trim() {
            "" => client_path,
            title => title,
        };
        let body = ContentVersionRequest::new(title, client_path, &bytes);
        self.content.create_content_version(&body).await
    }

    async fn payload(&self, request: &PublishRequest) -> Result<Vec<u8>, RecordFailure> {
        if let Some(path) = request.local_path.as_ref().filter(|p| !p.as_os_str().is_empty()) {
            return tokio::fs::read(path).await.map_err(|e| {
                RecordFailure::local_io(format!("Could not read {}: {}", path.display(), e))
            });
        }

        let locator = request.source_locator.trim();
        if locator.is_empty() {
            return Err(RecordFailure::input(format!(
                "Row {}: missing S3_URL and no local file",
                request.row
            )));
        }

        self.source.download_bytes(locator).await
    }
}
