//! Source store client
//!
//! Sources are opaque locators fetched with a plain GET, typically presigned
//! S3 URLs, so no object-store SDK is involved.

use crate::error::Result;
use medialift_common::{error_chain, RecordFailure};
use reqwest::{Client, Response};
use std::time::Duration;

/// HTTP client for reading source objects
#[derive(Debug, Clone)]
pub struct SourceClient {
    client: Client,
}

impl SourceClient {
    /// Create a client that gives up when connecting, or waiting for the
    /// next chunk of a body, takes longer than `idle_timeout`.
    ///
    /// There is no limit on the total transfer time, so a large object keeps
    /// streaming as long as bytes keep arriving.
    pub fn new(idle_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(idle_timeout)
            .read_timeout(idle_timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Start a GET of `locator` and return the response once the status is
    /// known to be a success. The body is left unread for streaming.
    pub async fn open(&self, locator: &str) -> std::result::Result<Response, RecordFailure> {
        let response = self
            .client
            .get(locator)
            .send()
            .await
            .map_err(|e| {
                RecordFailure::transport(format!("Source request failed: {}", error_chain(&e)))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecordFailure::transport(format!(
                "Source download failed: {}",
                status
            )));
        }

        Ok(response)
    }

    /// Download a whole object into memory
    pub async fn download_bytes(&self, locator: &str) -> std::result::Result<Vec<u8>, RecordFailure> {
        let response = self.open(locator).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| {
                RecordFailure::transport(format!("Source body could not be read: {}", error_chain(&e)))
            })?;
        Ok(bytes.to_vec())
    }
}
