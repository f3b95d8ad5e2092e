//! Error types for medialift

use thiserror::Error;

/// Result type alias for medialift operations
pub type Result<T> = std::result::Result<T, LiftError>;

/// Main error type for the shared utilities
#[derive(Error, Debug)]
pub enum LiftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid status value: {0}")]
    InvalidStatus(String),
}

/// Render an error followed by each of its causes, separated by `": "`.
///
/// HTTP client errors often hide the interesting part (a timeout, a reset
/// connection) in their sources. Repeated messages are printed once.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut last = message.clone();
    let mut source = err.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !last.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        last = text;
        source = cause.source();
    }

    message
}
