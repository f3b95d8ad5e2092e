//! HTTP clients for both ends of a transfer
//!
//! - [`SourceClient`]: plain GETs of opaque source locators (presigned S3 URLs)
//! - [`ContentClient`]: ContentVersion creation on the destination REST API

pub mod content;
pub mod endpoints;
pub mod source;
pub mod types;

pub use content::ContentClient;
pub use source::SourceClient;
pub use types::*;
