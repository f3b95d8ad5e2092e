//! Destination API request and response types

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// Body of a ContentVersion create request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentVersionRequest {
    #[serde(rename = "Title")]
    pub title: String,

    /// Client-visible file name; the destination derives the file type from it
    #[serde(rename = "PathOnClient")]
    pub path_on_client: String,

    /// Base64-encoded file bytes
    #[serde(rename = "VersionData")]
    pub version_data: String,
}

impl ContentVersionRequest {
    /// Build a request, base64-encoding `data`
    pub fn new(title: impl Into<String>, path_on_client: impl Into<String>, data: &[u8]) -> Self {
        Self {
            title: title.into(),
            path_on_client: path_on_client.into(),
            version_data: STANDARD.encode(data),
        }
    }
}

/// Body returned with `201 Created`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateResponse {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub success: Option<bool>,

    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

/// A successfully created destination object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    /// Destination identifier (ContentVersion id)
    pub id: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_with_destination_field_names() {
        let request = ContentVersionRequest::new("Intro", "intro-1.mp3", b"hello");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Title": "Intro",
                "PathOnClient": "intro-1.mp3",
                "VersionData": "aGVsbG8="
            })
        );
    }

    #[test]
    fn test_create_response_tolerates_missing_fields() {
        let response: CreateResponse = serde_json::from_str(r#"{"id":"068xx0000001"}"#).unwrap();
        assert_eq!(response.id.as_deref(), Some("068xx0000001"));
        assert!(response.errors.is_empty());

        let response: CreateResponse = serde_json::from_str("{}").unwrap();
        assert!(response.id.is_none());
    }
}
