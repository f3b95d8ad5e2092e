//! Checksum utilities for transfer integrity
//!
//! SHA-256 over the exact bytes written, rendered as lowercase hex.

use crate::error::Result;
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Incremental SHA-256 fed chunk by chunk while a body streams to disk.
#[derive(Debug, Clone, Default)]
pub struct StreamingChecksum {
    hasher: Sha256,
    bytes: u64,
}

impl StreamingChecksum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk of the stream
    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
        self.bytes += chunk.len() as u64;
    }

    /// Number of bytes hashed so far
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Finish hashing and return the hex digest
    pub fn finalize(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

/// Compute SHA-256 checksum of bytes
pub fn compute_checksum(data: &[u8]) -> String {
    let mut checksum = StreamingChecksum::new();
    checksum.update(data);
    checksum.finalize()
}

/// Compute SHA-256 checksum of a file without loading it whole
pub fn compute_file_checksum(path: impl AsRef<Path>) -> Result<String> {
    let mut file = std::fs::File::open(path.as_ref())?;
    let mut checksum = StreamingChecksum::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        checksum.update(&buffer[..bytes_read]);
    }

    Ok(checksum.finalize())
}
