//! Configuration management for the medialift CLI
//!
//! Values come from built-in defaults, then `MEDIALIFT_*` environment
//! variables (a `.env` file is loaded by `main`), then command-line flags.

use crate::error::{CliError, Result};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Salesforce REST API version used for ContentVersion uploads.
pub const DEFAULT_API_VERSION: &str = "64.0";

/// How long a connection may sit idle (connecting, or waiting for the next
/// bytes) before a source or destination request fails, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Pause between consecutive source downloads, in milliseconds.
pub const DEFAULT_FETCH_DELAY_MS: u64 = 100;

/// Download folder used when the platform has no standard one.
pub const FALLBACK_DOWNLOAD_DIR: &str = "./downloads";

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory fetched files are written under
    pub download_dir: PathBuf,

    /// Destination instance base URL, e.g. `https://acme.my.salesforce.com`
    pub instance_url: Option<String>,

    /// Bearer token for the destination API
    pub access_token: Option<String>,

    /// Destination REST API version
    pub api_version: String,

    /// Idle timeout for source and destination connections. A transfer that
    /// keeps receiving bytes is never cut off.
    pub timeout: Duration,

    /// Courtesy delay between source downloads
    pub fetch_delay: Duration,
}

impl Config {
    /// Create a config with default values
    pub fn new() -> Self {
        let download_dir = dirs::download_dir()
            .map(|dir| dir.join("medialift"))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DOWNLOAD_DIR));

        Self {
            download_dir,
            instance_url: None,
            access_token: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            fetch_delay: Duration::from_millis(DEFAULT_FETCH_DELAY_MS),
        }
    }

    /// Load config from environment variables
    ///
    /// - `MEDIALIFT_DOWNLOAD_DIR`
    /// - `MEDIALIFT_INSTANCE_URL`
    /// - `MEDIALIFT_ACCESS_TOKEN`
    /// - `MEDIALIFT_API_VERSION`
    /// - `MEDIALIFT_TIMEOUT_SECS`
    /// - `MEDIALIFT_FETCH_DELAY_MS`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new();

        if let Ok(dir) = std::env::var("MEDIALIFT_DOWNLOAD_DIR") {
            config.download_dir = PathBuf::from(dir);
        }

        if let Ok(url) = std::env::var("MEDIALIFT_INSTANCE_URL") {
            config.set_instance_url(url);
        }

        if let Ok(token) = std::env::var("MEDIALIFT_ACCESS_TOKEN") {
            config.access_token = Some(token);
        }

        if let Ok(version) = std::env::var("MEDIALIFT_API_VERSION") {
            config.api_version = version;
        }

        if let Ok(secs) = std::env::var("MEDIALIFT_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_number("MEDIALIFT_TIMEOUT_SECS", &secs)?);
        }

        if let Ok(ms) = std::env::var("MEDIALIFT_FETCH_DELAY_MS") {
            config.fetch_delay = Duration::from_millis(parse_number("MEDIALIFT_FETCH_DELAY_MS", &ms)?);
        }

        Ok(config)
    }

    /// Set the destination base URL, dropping any trailing slash
    pub fn set_instance_url(&mut self, url: String) {
        self.instance_url = Some(url.trim_end_matches('/').to_string());
    }

    /// Destination URL and token, or a configuration error naming what is missing
    pub fn destination_credentials(&self) -> Result<(&str, &str)> {
        let url = self
            .instance_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| CliError::config("destination instance URL is not set (MEDIALIFT_INSTANCE_URL or --instance-url)"))?;
        let token = self
            .access_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| CliError::config("destination access token is not set (MEDIALIFT_ACCESS_TOKEN or --access-token)"))?;
        Ok((url, token))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_number(var: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::config(format!("{} must be a whole number, got '{}'", var, value)))
}
