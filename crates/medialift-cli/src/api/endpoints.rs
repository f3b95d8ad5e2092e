//! Destination endpoint URL builders

/// Build the ContentVersion create URL.
///
/// `api_version` may be given with or without a leading `v`.
pub fn content_version_url(base_url: &str, api_version: &str) -> String {
    format!(
        "{}/services/data/v{}/sobjects/ContentVersion",
        base_url.trim_end_matches('/'),
        api_version.trim_start_matches('v')
    )
}
