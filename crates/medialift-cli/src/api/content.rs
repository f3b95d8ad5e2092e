//! Destination content API client
//!
//! Creates one ContentVersion per call. Anything other than `201 Created`
//! with an `id` in the body is reported back as a record failure carrying
//! the raw response text.

use crate::api::{endpoints, types::*};
use crate::error::Result;
use medialift_common::{error_chain, RecordFailure};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Authenticated client for the destination REST API
#[derive(Debug, Clone)]
pub struct ContentClient {
    client: Client,
    base_url: String,
    api_version: String,
    access_token: String,
}

impl ContentClient {
    /// Create a new client. `idle_timeout` bounds connecting and each wait
    /// for response bytes, not the whole upload.
    pub fn new(
        base_url: impl Into<String>,
        api_version: impl Into<String>,
        access_token: impl Into<String>,
        idle_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(idle_timeout)
            .read_timeout(idle_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_version: api_version.into(),
            access_token: access_token.into(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a ContentVersion and return its identifier
    pub async fn create_content_version(
        &self,
        request: &ContentVersionRequest,
    ) -> std::result::Result<Created, RecordFailure> {
        let url = endpoints::content_version_url(&self.base_url, &self.api_version);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                RecordFailure::transport(format!("Upload request failed: {}", error_chain(&e)))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| {
                RecordFailure::transport(format!("Upload response could not be read: {}", error_chain(&e)))
            })?;

        if status != StatusCode::CREATED {
            tracing::debug!(status = %status, body = %body, "Destination rejected upload");
            return Err(RecordFailure::rejected(body));
        }

        let parsed: CreateResponse = serde_json::from_str(&body).map_err(|e| {
            RecordFailure::rejected(format!("Created response was not valid JSON ({}): {}", e, body))
        })?;

        match parsed.id.filter(|id| !id.is_empty()) {
            Some(id) => Ok(Created { id }),
            None => Err(RecordFailure::rejected(format!(
                "Created response did not include an id: {}",
                body
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use medialift_common::FailureKind;
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    const CV_PATH: &str = "/services/data/v64.0/sobjects/ContentVersion";

    fn client(server: &MockServer) -> ContentClient {
        ContentClient::new(server.uri(), "64.0", "token-123", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_create_content_version() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CV_PATH))
            .and(header("authorization", "Bearer token-123"))
            .and(body_json(serde_json::json!({
                "Title": "Intro",
                "PathOnClient": "intro-1.mp3",
                "VersionData": "aGk="
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "068000000000001AAA",
                "success": true,
                "errors": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let created = client(&server)
            .create_content_version(&ContentVersionRequest::new("Intro", "intro-1.mp3", b"hi"))
            .await
            .unwrap();
        assert_eq!(created.id, "068000000000001AAA");
    }

    #[tokio::test]
    async fn test_rejection_carries_response_body() {
        let server = MockServer::start().await;
        let body = r#"[{"message":"Session expired or invalid","errorCode":"INVALID_SESSION_ID"}]"#;
        Mock::given(method("POST"))
            .and(path(CV_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string(body))
            .mount(&server)
            .await;

        let failure = client(&server)
            .create_content_version(&ContentVersionRequest::new("Intro", "intro.mp3", b"hi"))
            .await
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::Rejected);
        assert_eq!(failure.detail, body);
    }

    #[tokio::test]
    async fn test_ok_instead_of_created_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":"068x"}"#))
            .mount(&server)
            .await;

        let failure = client(&server)
            .create_content_version(&ContentVersionRequest::new("a", "a", b""))
            .await
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::Rejected);
    }

    #[tokio::test]
    async fn test_created_without_id_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"success":true}"#))
            .mount(&server)
            .await;

        let failure = client(&server)
            .create_content_version(&ContentVersionRequest::new("a", "a", b""))
            .await
            .unwrap_err();
        assert!(failure.detail.contains("did not include an id"));
    }
}
