//! Error types for the medialift CLI
//!
//! Only stage-level problems live here: a manifest that cannot be read or
//! written, or configuration that prevents a stage from starting. Failures of
//! a single record never become a `CliError`; they are recorded in the output
//! manifest instead (see [`medialift_common::RecordFailure`]).

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Stage-level error type
///
/// All errors are user-facing with clear messages and suggestions.
#[derive(Error, Debug)]
pub enum CliError {
    /// Input manifest is missing
    #[error("Manifest not found: '{0}'. Verify the file path exists and you have read permissions.")]
    ManifestNotFound(String),

    /// Manifest could not be parsed or lacks a required column
    #[error("Invalid manifest '{path}': {reason}")]
    InvalidManifest { path: String, reason: String },

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your MEDIALIFT_* environment variables or command-line flags.")]
    Config(String),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl CliError {
    /// Create an invalid manifest error
    pub fn invalid_manifest(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidManifest {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
