//! Common types used across medialift
//!
//! Every stage reports one outcome per manifest row. Successful work carries
//! a stage-specific value; failures are downgraded to a [`RecordFailure`]
//! which ends up as status text plus a diagnostic in the output manifest.

use crate::error::LiftError;
use serde::{Deserialize, Serialize};

/// Where a record stands after the fetch stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    #[default]
    Pending,
    /// Bytes were downloaded during this run
    Fetched,
    /// The destination file was already on disk; nothing was transferred
    SkippedExists,
    Failed,
}

impl TransferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "pending",
            TransferStatus::Fetched => "fetched",
            TransferStatus::SkippedExists => "skipped_exists",
            TransferStatus::Failed => "failed",
        }
    }

    /// Whether the local bytes exist and may be published
    pub fn has_local_bytes(&self) -> bool {
        matches!(self, TransferStatus::Fetched | TransferStatus::SkippedExists)
    }
}

impl std::fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransferStatus {
    type Err = LiftError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "pending" => Ok(TransferStatus::Pending),
            "fetched" => Ok(TransferStatus::Fetched),
            "skipped_exists" => Ok(TransferStatus::SkippedExists),
            "failed" => Ok(TransferStatus::Failed),
            other => Err(LiftError::InvalidStatus(other.to_string())),
        }
    }
}

/// Where a record stands after the publish stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PublishStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

impl PublishStatus {
    /// Label written to the `Status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishStatus::Pending => "Pending",
            PublishStatus::Success => "Success",
            PublishStatus::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a per-record failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A required field was missing or blank
    Input,
    /// Network failure, non-success source status, or a truncated body
    Transport,
    /// Reading or writing the local filesystem failed
    LocalIo,
    /// The destination answered with something other than "created"
    Rejected,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Input => write!(f, "input"),
            FailureKind::Transport => write!(f, "transport"),
            FailureKind::LocalIo => write!(f, "local_io"),
            FailureKind::Rejected => write!(f, "rejected"),
        }
    }
}

/// A failure caught at the record boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFailure {
    pub kind: FailureKind,
    /// Human-readable diagnostic written to the output manifest
    pub detail: String,
}

impl RecordFailure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn input(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::Input, detail)
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::Transport, detail)
    }

    pub fn local_io(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::LocalIo, detail)
    }

    pub fn rejected(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::Rejected, detail)
    }
}

impl std::fmt::Display for RecordFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {}", self.kind, self.detail)
    }
}

impl std::error::Error for RecordFailure {}

impl From<std::io::Error> for RecordFailure {
    fn from(err: std::io::Error) -> Self {
        Self::local_io(err.to_string())
    }
}
