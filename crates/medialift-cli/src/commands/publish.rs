//! `medialift publish` command implementation
//!
//! Uploads every eligible row of the manifest as a ContentVersion and records
//! the destination's answer per row.

use crate::api::{ContentClient, SourceClient};
use crate::commands::fetch::{FILENAME_COLUMN, LOCAL_PATH_COLUMN, SOURCE_COLUMN, STATUS_COLUMN};
use crate::commands::rename::{NAME_COLUMN, RENAMED_COLUMN};
use crate::config::Config;
use crate::error::Result;
use crate::manifest::Manifest;
use crate::publish::{PublishReport, PublishRequest, TransferPublisher};
use colored::Colorize;
use medialift_common::TransferStatus;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const TITLE_COLUMN: &str = "Title";
pub const PATH_ON_CLIENT_COLUMN: &str = "PathOnClient";
pub const URL_COLUMN: &str = "S3_URL";
pub const RESULT_STATUS_COLUMN: &str = "Status";
pub const RESULT_MESSAGE_COLUMN: &str = "Message";
pub const RESULT_ID_COLUMN: &str = "ContentVersionId";

/// Publish every row of `input` and write the results to `output`
pub async fn run(input: &Path, output: &Path, config: &Config) -> Result<()> {
    let (instance_url, access_token) = config.destination_credentials()?;

    println!("{} Reading {}...", "→".cyan(), input.display());
    let mut manifest = Manifest::load(input)?;
    let requests = requests_from(&manifest)?;

    let content = ContentClient::new(instance_url, &config.api_version, access_token, config.timeout)?;
    let source = SourceClient::new(config.timeout)?;
    let publisher = TransferPublisher::new(content, source);

    println!("{} Uploading {} file(s) to {}", "↑".cyan(), requests.len(), instance_url);
    let report = publisher.publish_all(requests).await;

    record_results(&mut manifest, &report);
    manifest.save(output)?;

    info!(
        total = report.total(),
        succeeded = report.succeeded(),
        failed = report.failed(),
        skipped = report.skipped(),
        "Publish complete"
    );

    print_summary(&report, output);
    Ok(())
}

/// Build one request per manifest row.
///
/// `S3_URL` is read when present, otherwise the fetch stage's `s3_url`.
/// Without `Title` or `PathOnClient` columns the earlier stages' name
/// columns stand in: `renamed`, then `new_name`, then `filename`.
/// A `transfer_status` column restricts publishing to rows with local bytes.
pub fn requests_from(manifest: &Manifest) -> Result<Vec<PublishRequest>> {
    let name_col = [RENAMED_COLUMN, NAME_COLUMN, FILENAME_COLUMN]
        .into_iter()
        .find_map(|name| manifest.column(name));
    let title_col = match manifest.column(TITLE_COLUMN).or(name_col) {
        Some(col) => col,
        None => manifest.require_column(TITLE_COLUMN)?,
    };
    let path_col = manifest.column(PATH_ON_CLIENT_COLUMN).or(name_col);
    let url_col = manifest.column(URL_COLUMN).or_else(|| manifest.column(SOURCE_COLUMN));
    let local_col = manifest.column(LOCAL_PATH_COLUMN);
    let status_col = manifest.column(STATUS_COLUMN);

    let field = |row: usize, col: Option<usize>| -> String {
        col.map(|c| manifest.get(row, c).trim().to_string()).unwrap_or_default()
    };

    let requests = (0..manifest.len())
        .map(|row| {
            let local_path = Some(field(row, local_col))
                .filter(|p| !p.is_empty())
                .map(PathBuf::from);

            let transfer_status = status_col.map(|col| {
                let raw = manifest.get(row, col);
                raw.parse::<TransferStatus>().unwrap_or_else(|e| {
                    warn!(row = row + 1, value = raw, error = %e, "Unrecognized transfer status");
                    TransferStatus::Pending
                })
            });

            PublishRequest {
                row: row + 1,
                title: manifest.get(row, title_col).trim().to_string(),
                path_on_client: field(row, path_col),
                source_locator: field(row, url_col),
                local_path,
                transfer_status,
            }
        })
        .collect();

    Ok(requests)
}

/// Write each row's outcome into the `Status`, `Message` and `ContentVersionId` columns
pub fn record_results(manifest: &mut Manifest, report: &PublishReport) {
    let status_col = manifest.ensure_column(RESULT_STATUS_COLUMN);
    let message_col = manifest.ensure_column(RESULT_MESSAGE_COLUMN);
    let id_col = manifest.ensure_column(RESULT_ID_COLUMN);

    for (request, outcome) in &report.results {
        let row = request.row - 1;
        manifest.set(row, status_col, outcome.status().as_str());
        manifest.set(row, message_col, outcome.message());
        manifest.set(row, id_col, outcome.publish_id().unwrap_or(""));
    }
}

fn print_summary(report: &PublishReport, output: &Path) {
    println!();
    println!("{}", "Upload Summary:".cyan().bold());
    println!("  Total records: {}", report.total());
    println!("  {} Uploaded: {}", "✓".green(), report.succeeded());
    println!("  {} Failed: {}", "✗".red(), report.failed());
    if report.skipped() > 0 {
        println!("  {} Not eligible: {}", "-".yellow(), report.skipped());
    }
    println!();
    println!("{} Results written to {}", "✓".green(), output.display());
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::api::Created;
    use crate::publish::PublishOutcome;
    use medialift_common::RecordFailure;

    fn manifest(csv: &str) -> Manifest {
        Manifest::from_reader(csv.as_bytes(), "files.csv").unwrap()
    }

    #[test]
    fn test_requests_from_upload_manifest() {
        let m = manifest("Title,PathOnClient,S3_URL\nClip,clip.mp4,https://s3/clip\n");
        let requests = requests_from(&m).unwrap();
        assert_eq!(
            requests,
            vec![PublishRequest {
                row: 1,
                title: "Clip".into(),
                path_on_client: "clip.mp4".into(),
                source_locator: "https://s3/clip".into(),
                local_path: None,
                transfer_status: None,
            }]
        );
    }

    #[test]
    fn test_requests_from_fetch_output() {
        let m = manifest(
            "Title,s3_url,local_path,transfer_status\n\
             A,https://s3/a,/data/a-1.mp4,fetched\n\
             B,https://s3/b,,failed\n\
             C,https://s3/c,/data/c-1.mp4,bogus\n",
        );
        let requests = requests_from(&m).unwrap();

        assert_eq!(requests[0].source_locator, "https://s3/a");
        assert_eq!(requests[0].local_path, Some(PathBuf::from("/data/a-1.mp4")));
        assert_eq!(requests[0].transfer_status, Some(TransferStatus::Fetched));
        assert!(requests[0].ineligible_reason().is_none());

        assert_eq!(requests[1].local_path, None);
        assert!(requests[1].ineligible_reason().unwrap().contains("failed"));

        assert_eq!(requests[2].transfer_status, Some(TransferStatus::Pending));
        assert!(requests[2].ineligible_reason().is_some());
    }

    #[test]
    fn test_requests_from_fetch_output_without_title() {
        let m = manifest(
            "filename,s3_url,new_name,renamed,local_path,transfer_status,checksum,error_detail\n\
             one,https://s3/a,a.mp4,a-1.mp4,/data/a-1.mp4,fetched,abc,\n",
        );
        let requests = requests_from(&m).unwrap();

        assert_eq!(requests[0].title, "a-1.mp4");
        assert_eq!(requests[0].path_on_client, "a-1.mp4");
        assert_eq!(requests[0].local_path, Some(PathBuf::from("/data/a-1.mp4")));
        assert!(requests[0].ineligible_reason().is_none());
    }

    #[test]
    fn test_requests_fall_back_to_new_name_then_filename() {
        let m = manifest("filename,new_name,s3_url\none,a.mp4,u1\n");
        assert_eq!(requests_from(&m).unwrap()[0].title, "a.mp4");

        let m = manifest("filename,s3_url\none.mp4,u1\n");
        let requests = requests_from(&m).unwrap();
        assert_eq!(requests[0].title, "one.mp4");
        assert_eq!(requests[0].client_path(), "one.mp4");
    }

    #[test]
    fn test_explicit_columns_win_over_name_columns() {
        let m = manifest("Title,renamed,s3_url\nIntro,intro-1.mp3,u1\n");
        let requests = requests_from(&m).unwrap();
        assert_eq!(requests[0].title, "Intro");
        assert_eq!(requests[0].path_on_client, "intro-1.mp3");
    }

    #[test]
    fn test_requests_require_title_or_name_column() {
        let m = manifest("PathOnClient,S3_URL\nclip.mp4,https://s3/clip\n");
        let err = requests_from(&m).unwrap_err();
        assert!(err.to_string().contains("Title"));
    }

    #[test]
    fn test_record_results() {
        let mut m = manifest("Title,PathOnClient,S3_URL\nA,a.mp4,u1\nB,b.mp4,u2\nC,c.mp4,u3\n");
        let requests = requests_from(&m).unwrap();
        let report = PublishReport {
            results: vec![
                (
                    requests[0].clone(),
                    PublishOutcome::Attempted(Ok(Created { id: "068xx0000001".into() })),
                ),
                (
                    requests[1].clone(),
                    PublishOutcome::Attempted(Err(RecordFailure::rejected(
                        r#"[{"errorCode":"INVALID_FIELD"}]"#,
                    ))),
                ),
                (
                    requests[2].clone(),
                    PublishOutcome::Skipped("Not published: transfer status is failed".into()),
                ),
            ],
        };

        record_results(&mut m, &report);

        assert_eq!(m.value(0, RESULT_STATUS_COLUMN), "Success");
        assert_eq!(m.value(0, RESULT_MESSAGE_COLUMN), "Uploaded successfully");
        assert_eq!(m.value(0, RESULT_ID_COLUMN), "068xx0000001");

        assert_eq!(m.value(1, RESULT_STATUS_COLUMN), "Failed");
        assert_eq!(m.value(1, RESULT_MESSAGE_COLUMN), r#"[{"errorCode":"INVALID_FIELD"}]"#);
        assert_eq!(m.value(1, RESULT_ID_COLUMN), "");

        assert_eq!(m.value(2, RESULT_STATUS_COLUMN), "Pending");
        assert_eq!(m.value(2, RESULT_ID_COLUMN), "");
    }

    #[tokio::test]
    async fn test_run_without_credentials_fails_before_reading() {
        let config = Config::new();
        let err = run(Path::new("does-not-exist.csv"), Path::new("out.csv"), &config)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("instance URL"));
    }
}
