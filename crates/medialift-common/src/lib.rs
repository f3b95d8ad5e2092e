//! medialift Common Library
//!
//! Shared types, utilities, and error handling for the medialift workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`LiftError`] and the [`Result`] alias
//! - **Checksums**: streaming SHA-256 used to fingerprint transferred bytes
//! - **Logging**: `tracing` subscriber setup shared by every binary
//! - **Types**: per-record transfer and publish outcomes
//!
//! # Example
//!
//! ```no_run
//! use medialift_common::checksum::compute_file_checksum;
//!
//! fn fingerprint(path: &str) -> medialift_common::Result<()> {
//!     let checksum = compute_file_checksum(path)?;
//!     println!("File checksum: {}", checksum);
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod checksum;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{error_chain, LiftError, Result};
pub use types::{FailureKind, PublishStatus, RecordFailure, TransferStatus};
